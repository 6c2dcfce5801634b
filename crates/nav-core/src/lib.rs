//! `nav-core` — foundational types for the `arena-nav` movement layer.
//!
//! This crate is a dependency of every other `nav-*` crate.  It intentionally
//! has no `nav-*` dependencies and no required external ones (only optional
//! `serde`); error enums live in the crates whose operations produce them.
//!
//! # What lives here
//!
//! | Module      | Contents                                         |
//! |-------------|--------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`, `AgentId`                    |
//! | [`vec2`]    | `Vec2`, angle helpers, point-segment distance    |
//! | [`team`]    | `Faction`, `AgentClass`                          |
//! | [`time`]    | `Tick`, `TickClock`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod team;
pub mod time;
pub mod vec2;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{AgentId, EdgeId, NodeId};
pub use team::{AgentClass, Faction};
pub use time::{Tick, TickClock};
pub use vec2::Vec2;

//! `nav-session` — session lifecycle and the fixed-tick drive loop.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`session`]   | `Session`, `Agent`, `SessionConfig`, the tick loop      |
//! | [`influence`] | `InfluenceField`, `AgentSnapshot`                       |
//! | [`observer`]  | `SessionObserver`, `NoopObserver`                       |
//! | [`error`]     | `SessionError`, `SessionResult<T>`                      |
//!
//! # Ownership
//!
//! The original engine reached graph and agents through globally registered
//! scene objects.  Here the [`Session`] owns everything explicitly: the
//! static geometry, the navigation graph built from it at construction, the
//! tick clock, and the agent roster.  Every tick it snapshots agent
//! positions, assembles a borrow-only [`SteerContext`][nav_steer::SteerContext]
//! per agent, and advances each controller exactly once — single-threaded,
//! cooperative, no cross-agent synchronization.

pub mod error;
pub mod influence;
pub mod observer;
pub mod session;


pub use error::{SessionError, SessionResult};
pub use influence::{AgentSnapshot, InfluenceField};
pub use observer::{NoopObserver, SessionObserver};
pub use session::{Agent, Session, SessionConfig};

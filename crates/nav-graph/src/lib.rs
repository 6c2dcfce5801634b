//! `nav-graph` — clearance probing, graph construction, and path search.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`clearance`] | `ClearanceOracle` trait, `StaticGeometry`, `ProbeGuard`   |
//! | [`graph`]     | `NavGraph` (CSR + R-tree + cell index), `GraphConfig`     |
//! | [`search`]    | `find_path` (A*), `Path`, `PathOptions`, `InfluenceSource`|
//! | [`error`]     | `GraphError`, `GraphResult<T>`                            |
//!
//! # Lifecycle
//!
//! A [`NavGraph`] is built exactly once per level from the static geometry
//! and is read-only afterwards.  Any number of agents may query it
//! concurrently; nothing mutates it after `NavGraph::build` returns.  If the
//! level geometry changes the graph is stale and must be rebuilt — staleness
//! is not detected here.

pub mod clearance;
pub mod error;
pub mod graph;
pub mod search;

#[cfg(test)]
mod tests;

pub use clearance::{ClearanceOracle, ProbeGuard, StaticGeometry};
pub use error::{GraphError, GraphResult};
pub use graph::{Bounds, GraphConfig, NavGraph};
pub use search::{find_path, InfluenceSource, Path, PathOptions};

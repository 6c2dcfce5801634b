//! Per-tick collaborator context handed to the steering controller.
//!
//! Replaces scene-bound singleton lookups with explicit references: the
//! session owns the graph, the geometry oracle, and the roster, and lends
//! them to each controller for the duration of one request or tick.  The
//! context is a bundle of borrows — cheap to rebuild every tick.

use nav_core::{AgentId, Vec2};
use nav_graph::{find_path, ClearanceOracle, GraphResult, InfluenceSource, NavGraph, Path, PathOptions};

/// Live position lookup for chase targets.
///
/// Returning `None` means the target has ceased to exist; an in-flight chase
/// abandons its task (without firing its completion) when that happens.
pub trait TargetLookup {
    fn target_position(&self, target: AgentId) -> Option<Vec2>;
}

/// Everything a controller needs from the outside world for one call.
pub struct SteerContext<'a> {
    /// The level's navigation graph — shared, read-only.
    pub graph: &'a NavGraph,

    /// Static-geometry clearance oracle.
    pub oracle: &'a dyn ClearanceOracle,

    /// Position source for chase targets.
    pub targets: &'a dyn TargetLookup,

    /// Optional tactical bias applied to searches issued through this
    /// context.
    pub influence: Option<&'a dyn InfluenceSource>,
}

impl SteerContext<'_> {
    /// Run an approximate path search with this context's influence source.
    pub fn find_path(&self, from: Vec2, to: Vec2) -> GraphResult<Path> {
        let opts = PathOptions { approximate: true, influence: self.influence };
        find_path(self.graph, &self.oracle, from, to, &opts)
    }
}

/// A [`TargetLookup`] with no targets.  For controllers that never chase.
pub struct NoTargets;

impl TargetLookup for NoTargets {
    fn target_position(&self, _target: AgentId) -> Option<Vec2> {
        None
    }
}

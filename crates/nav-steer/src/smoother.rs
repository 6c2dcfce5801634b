//! Greedy path smoothing (string-pulling).
//!
//! A raw search path follows grid nodes; an agent walking it literally would
//! zig-zag.  Instead, every tick the controller asks: from where I stand
//! *right now*, what is the furthest waypoint I can reach in a straight
//! clear sweep?  As the agent advances the answer jumps forward, collapsing
//! the path into a few long segments without ever mutating the path itself.

use std::cell::Cell;

use nav_core::Vec2;
use nav_graph::{ClearanceOracle, ProbeGuard};

/// Index of the furthest waypoint in `waypoints[from..]` reachable by a
/// clear straight segment from `position`, at the agent's `radius`.
///
/// The scan checks every candidate rather than stopping at the first
/// occluded one, so a clear line past an occluded intermediate still wins.
/// The final waypoint is treated as reachable when the agent is already
/// within `acceptance` of it, even if technically occluded — otherwise an
/// agent whose goal hugs a wall would stall just short of arrival.
///
/// The agent's own collision volume is disabled for the duration of the
/// scan via `collision` and restored on return.
pub fn smooth_index(
    oracle: &dyn ClearanceOracle,
    collision: &Cell<bool>,
    position: Vec2,
    waypoints: &[Vec2],
    from: usize,
    radius: f32,
    acceptance: f32,
) -> usize {
    if waypoints.is_empty() {
        return from;
    }
    let _guard = ProbeGuard::disable(collision);

    let mut best = from.min(waypoints.len() - 1);
    for i in (from + 1)..waypoints.len() {
        if oracle.segment_clear(position, waypoints[i], radius) {
            best = i;
        }
    }

    let last = waypoints.len() - 1;
    if best < last && position.distance(waypoints[last]) <= acceptance {
        best = last;
    }
    best
}

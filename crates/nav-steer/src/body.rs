//! Kinematic body of a steering agent.

use std::cell::Cell;

use nav_core::Vec2;

/// Position, heading, and velocity of one agent, plus the collision-enable
/// flag that clearance probes disable while scanning.
///
/// The flag lives in a `Cell` so the smoother can flip it through a shared
/// reference while the rest of the body stays behind `&mut` discipline —
/// steering is single-threaded by contract, so no atomics are needed.
#[derive(Debug)]
pub struct Body {
    /// World position on the ground plane.
    pub position: Vec2,

    /// Facing direction in radians (0 = +x).
    pub heading: f32,

    /// Velocity applied this tick.  Zero whenever no task is translating.
    pub velocity: Vec2,

    /// Whether the agent's own collision volume is active.  Probes disable
    /// it for the duration of a scan via [`nav_graph::ProbeGuard`] and
    /// restore it unconditionally.
    pub collision_enabled: Cell<bool>,
}

impl Body {
    pub fn new(position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading,
            velocity: Vec2::ZERO,
            collision_enabled: Cell::new(true),
        }
    }

    /// Unit vector of the current heading.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }
}

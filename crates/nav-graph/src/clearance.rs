//! Clearance probing against static level geometry.
//!
//! The graph builder, the path search, and the per-tick smoother all ask the
//! same two questions: "can a disc of radius `r` sit at this point?" and
//! "can it sweep along this segment?".  [`ClearanceOracle`] is that contract.
//! Queries are pure and total — there is no error path; an oracle always
//! resolves to a boolean.
//!
//! Probes must never collide with the probing agent's own body.  The agent's
//! collision-enable flag is treated as a scoped resource via [`ProbeGuard`]:
//! disabled on acquire, unconditionally restored on drop, even when the probe
//! loop exits early.

use std::cell::Cell;

use nav_core::vec2::point_segment_distance;
use nav_core::Vec2;

/// Boolean obstruction queries against a designated static-geometry layer.
pub trait ClearanceOracle {
    /// `true` when no obstruction lies closer than `radius` to `pos`.
    fn point_clear(&self, pos: Vec2, radius: f32) -> bool;

    /// `true` when no obstruction lies within `radius` of the straight
    /// segment `a`–`b` (a capsule sweep).
    fn segment_clear(&self, a: Vec2, b: Vec2, radius: f32) -> bool;
}

impl<T: ClearanceOracle + ?Sized> ClearanceOracle for &T {
    fn point_clear(&self, pos: Vec2, radius: f32) -> bool {
        (**self).point_clear(pos, radius)
    }
    fn segment_clear(&self, a: Vec2, b: Vec2, radius: f32) -> bool {
        (**self).segment_clear(a, b, radius)
    }
}

// ── ProbeGuard ────────────────────────────────────────────────────────────────

/// RAII guard that disables an agent's own collision flag for the duration
/// of a clearance scan.
///
/// The flag is restored to its prior value on drop, so nesting is harmless
/// and early exits from a probe loop cannot leave the agent intangible.
pub struct ProbeGuard<'a> {
    flag: &'a Cell<bool>,
    prior: bool,
}

impl<'a> ProbeGuard<'a> {
    pub fn disable(flag: &'a Cell<bool>) -> Self {
        let prior = flag.get();
        flag.set(false);
        Self { flag, prior }
    }
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.prior);
    }
}

// ── StaticGeometry ────────────────────────────────────────────────────────────

/// A circular obstacle.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// An axis-aligned rectangular obstacle.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Distance from `p` to the rectangle (zero when inside).
    fn distance(&self, p: Vec2) -> f32 {
        let cx = p.x.clamp(self.min.x, self.max.x);
        let cy = p.y.clamp(self.min.y, self.max.y);
        p.distance(Vec2::new(cx, cy))
    }

    /// Segment-vs-rectangle overlap via the slab method, with the rectangle
    /// pre-inflated by the caller.
    fn intersects_segment(&self, a: Vec2, b: Vec2) -> bool {
        let d = b - a;
        let mut t_min = 0.0f32;
        let mut t_max = 1.0f32;

        for (da, pa, lo, hi) in [
            (d.x, a.x, self.min.x, self.max.x),
            (d.y, a.y, self.min.y, self.max.y),
        ] {
            if da.abs() <= f32::EPSILON {
                if pa < lo || pa > hi {
                    return false;
                }
            } else {
                let inv = 1.0 / da;
                let (t0, t1) = ((lo - pa) * inv, (hi - pa) * inv);
                let (t0, t1) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
                if t_min > t_max {
                    return false;
                }
            }
        }
        true
    }
}

/// The static level layer: an immutable obstacle set implementing
/// [`ClearanceOracle`].
///
/// Circles use exact capsule distance.  Rectangles inflate by the probe
/// radius and test segment overlap, which is marginally conservative at the
/// corners (a rounded corner becomes square).  For a navigation probe that
/// means at worst a slightly wider berth around box corners.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticGeometry {
    circles: Vec<Circle>,
    boxes: Vec<Aabb>,
}

impl StaticGeometry {
    /// An empty level — every probe is clear.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn add_circle(&mut self, center: Vec2, radius: f32) -> &mut Self {
        self.circles.push(Circle { center, radius });
        self
    }

    pub fn add_box(&mut self, min: Vec2, max: Vec2) -> &mut Self {
        self.boxes.push(Aabb { min, max });
        self
    }

    /// A wall of thickness `2 * half_width` from `a` to `b`, axis-aligned.
    ///
    /// Convenience for level layouts; `a` and `b` must share an axis.
    pub fn add_wall(&mut self, a: Vec2, b: Vec2, half_width: f32) -> &mut Self {
        let min = Vec2::new(a.x.min(b.x) - half_width, a.y.min(b.y) - half_width);
        let max = Vec2::new(a.x.max(b.x) + half_width, a.y.max(b.y) + half_width);
        self.add_box(min, max)
    }

    pub fn obstacle_count(&self) -> usize {
        self.circles.len() + self.boxes.len()
    }
}

impl ClearanceOracle for StaticGeometry {
    fn point_clear(&self, pos: Vec2, radius: f32) -> bool {
        for c in &self.circles {
            if pos.distance(c.center) < radius + c.radius {
                return false;
            }
        }
        for b in &self.boxes {
            if b.distance(pos) < radius {
                return false;
            }
        }
        true
    }

    fn segment_clear(&self, a: Vec2, b: Vec2, radius: f32) -> bool {
        for c in &self.circles {
            if point_segment_distance(c.center, a, b) < radius + c.radius {
                return false;
            }
        }
        for bx in &self.boxes {
            let inflated = Aabb {
                min: bx.min - Vec2::new(radius, radius),
                max: bx.max + Vec2::new(radius, radius),
            };
            if inflated.intersects_segment(a, b) {
                return false;
            }
        }
        true
    }
}

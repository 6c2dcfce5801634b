//! Fixed-timestep time model.
//!
//! Steering advances on a fixed physics tick, separate from any variable-rate
//! render loop.  Time is a monotonically increasing `Tick` counter; the
//! mapping to seconds lives in `TickClock` so schedule arithmetic stays exact
//! (no floating-point drift in the counter itself).

/// A discrete simulation tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Fixed-timestep clock: current tick plus the seconds each tick spans.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickClock {
    /// The current tick, starting at 0.
    pub current: Tick,
    /// Duration of one tick in seconds.  Default is 1/50 s, the classic
    /// physics fixed timestep.
    pub dt: f32,
}

impl TickClock {
    pub fn new(dt: f32) -> Self {
        Self { current: Tick(0), dt }
    }

    /// Advance to the next tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current = Tick(self.current.0 + 1);
    }

    /// Seconds elapsed since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.current.0 as f32 * self.dt
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(0.02)
    }
}

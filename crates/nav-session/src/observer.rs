//! Session observer trait for progress reporting and instrumentation.

use nav_core::{AgentId, Tick};
use nav_steer::TickStatus;

/// Callbacks invoked by [`Session::tick`][crate::Session::tick] at key
/// points in the loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SessionObserver {
    /// Called at the very start of each tick, before any agent steps.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after each agent's controller advanced one step.
    fn on_agent_step(&mut self, _tick: Tick, _agent: AgentId, _status: TickStatus) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick) {}
}

/// A [`SessionObserver`] that does nothing.  Use when you need to call
/// `tick` but don't want callbacks.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

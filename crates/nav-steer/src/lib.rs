//! `nav-steer` — path smoothing and the per-agent steering state machine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`body`]       | `Body` — kinematic state + collision-enable flag         |
//! | [`smoother`]   | `smooth_index` — per-tick string-pulling                 |
//! | [`context`]    | `SteerContext`, `TargetLookup`                           |
//! | [`controller`] | `SteeringController`, `SteerParams`, `TickStatus`        |
//! | [`error`]      | `SteerError`, `SteerResult<T>`                           |
//!
//! # Movement model
//!
//! Each agent owns exactly one [`SteeringController`].  Movement requests
//! (`move_to` / `arrive` / `face` / `chase`) cancel whatever task is running,
//! compute an initial path where one is needed, and arm the state machine.
//! The caller's fixed-tick loop then drives [`SteeringController::tick`]
//! once per physics step; each call re-smooths the path from the agent's
//! current position, rotates the heading at a bounded rate, and translates
//! at a bounded, arrival-eased speed.  There is no queuing: a new request
//! supersedes the old task entirely.
//!
//! Controllers are exclusively owned and never shared between agents; the
//! only shared structure they touch is the immutable
//! [`nav_graph::NavGraph`] handed in through [`SteerContext`].

pub mod body;
pub mod context;
pub mod controller;
pub mod error;
pub mod smoother;


pub use body::Body;
pub use context::{NoTargets, SteerContext, TargetLookup};
pub use controller::{Completion, SteerParams, SteeringController, TickStatus};
pub use error::{SteerError, SteerResult};
pub use smoother::smooth_index;

//! Steering-subsystem error type.

use thiserror::Error;

use nav_core::AgentId;
use nav_graph::GraphError;

/// Errors produced by `nav-steer`.
///
/// A failed movement request leaves the agent stopped in place — these are
/// reported to the caller, never allowed to take the agent into motion on an
/// invalid path.
#[derive(Debug, Error)]
pub enum SteerError {
    /// The initial path computation failed (unreachable goal, empty graph).
    #[error("path computation failed: {0}")]
    NoPath(#[from] GraphError),

    /// A chase was requested against a target that does not exist.
    #[error("chase target {0} does not exist")]
    TargetLost(AgentId),
}

pub type SteerResult<T> = Result<T, SteerError>;

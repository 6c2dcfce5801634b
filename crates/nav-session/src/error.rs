//! Session-subsystem error type.

use thiserror::Error;

use nav_core::AgentId;
use nav_graph::GraphError;
use nav_steer::SteerError;

/// Errors produced by `nav-session`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error(transparent)]
    Steer(#[from] SteerError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type SessionResult<T> = Result<T, SessionError>;

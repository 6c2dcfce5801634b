//! Graph-subsystem error type.

use thiserror::Error;

use nav_core::NodeId;

/// Errors produced by `nav-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The open set was exhausted without reaching the goal node.
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    /// The graph has no nodes — the sampling bounds were fully obstructed
    /// or the graph was never built.
    #[error("navigation graph is empty")]
    EmptyGraph,
}

pub type GraphResult<T> = Result<T, GraphError>;

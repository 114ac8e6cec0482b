//! Error types for the host model and the render driver.

use thiserror::Error;

use crate::types::NodeId;

/// Failures reported by a [`Host`](crate::dom::Host) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The handle does not refer to a live node (never created, or removed
    /// by an earlier swap).
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// The operation needs an element but the handle is a text node.
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    /// Appending would make a node its own ancestor.
    #[error("cannot append {child} under {parent}")]
    InvalidHierarchy { parent: NodeId, child: NodeId },
}

/// Result alias for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Failures surfaced by the render driver.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// `update()` was called with no mounted root.
    #[error("no root is mounted")]
    NotMounted,
    /// The host was already borrowed when a cycle needed it (a caller held
    /// a `RefCell` borrow across a state change).
    #[error("host is borrowed elsewhere")]
    HostBusy,
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for driver operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

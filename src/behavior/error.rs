//! Errors returned by behavior tree mutation.

use crate::behavior::node::NodeId;
use thiserror::Error;

/// Errors that can occur when editing a behavior tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node {0} already exists in this tree")]
    DuplicateNode(NodeId),

    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Node {0} is a leaf and cannot have children")]
    NotComposite(NodeId),

    #[error("Node {0} already belongs to a tree")]
    AttachedNode(NodeId),

    #[error("The root node cannot be removed")]
    RootRemoval,
}

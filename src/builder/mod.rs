//! Builder API for ergonomic machine and tree construction.
//!
//! This module provides fluent builders that collect a definition and
//! validate it once, on `build()`.

pub mod error;
pub mod machine;
pub mod tree;

pub use error::BuildError;
pub use machine::FsmBuilder;
pub use tree::TreeBuilder;

use crate::behavior::{BehaviorTree, NodeId};

/// Build a tree whose root runs the given leaves in order, one per tick.
///
/// Each entry is `(node_id, action_id)`.
///
/// # Example
///
/// ```
/// use agentmind::builder::sequence_of;
///
/// let tree = sequence_of(1, &[(2, 10), (3, 11)]).unwrap();
/// assert_eq!(tree.children(1).unwrap(), vec![2, 3]);
/// ```
pub fn sequence_of(tree_id: u32, leaves: &[(NodeId, u32)]) -> Result<BehaviorTree, BuildError> {
    leaves
        .iter()
        .fold(TreeBuilder::new(tree_id), |builder, &(id, action)| {
            builder.leaf(id, action, 0, Vec::new())
        })
        .build()
}

/// Build a tree whose root tries the given leaves until one succeeds.
///
/// # Example
///
/// ```
/// use agentmind::builder::selector_of;
///
/// let tree = selector_of(1, 10, &[(11, 1), (12, 2)]).unwrap();
/// assert_eq!(tree.children(10).unwrap(), vec![11, 12]);
/// ```
pub fn selector_of(
    tree_id: u32,
    selector_id: NodeId,
    leaves: &[(NodeId, u32)],
) -> Result<BehaviorTree, BuildError> {
    leaves
        .iter()
        .fold(
            TreeBuilder::new(tree_id).selector(selector_id),
            |builder, &(id, action)| builder.leaf(id, action, 0, Vec::new()),
        )
        .end()
        .build()
}

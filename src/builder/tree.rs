//! Builder for constructing behavior trees.

use crate::behavior::{BehaviorNode, BehaviorTree, NodeId, NodeKind, ROOT_NODE_ID};
use crate::builder::error::BuildError;
use crate::core::Param;

/// Builder for behavior trees with a fluent, indentation-shaped API.
///
/// Composites are opened with `sequence`/`selector`/`parallel` and closed
/// with `end`; leaves are attached to the innermost open composite, which
/// starts out as the root. The first error is kept and returned by `build`.
///
/// # Example
///
/// ```rust
/// use agentmind::builder::TreeBuilder;
///
/// let tree = TreeBuilder::new(1)
///     .selector(10)
///         .leaf(11, 1, 0, vec![])
///         .leaf(12, 2, 0, vec![])
///     .end()
///     .leaf(20, 3, 0, vec![])
///     .build()
///     .unwrap();
///
/// assert_eq!(tree.children(1).unwrap(), vec![10, 20]);
/// ```
pub struct TreeBuilder {
    tree: BehaviorTree,
    open: Vec<NodeId>,
    error: Option<BuildError>,
}

impl TreeBuilder {
    /// Start a tree whose root sequence is the open composite.
    pub fn new(id: u32) -> Self {
        Self {
            tree: BehaviorTree::new(id),
            open: vec![ROOT_NODE_ID],
            error: None,
        }
    }

    pub fn sequence(self, id: NodeId) -> Self {
        self.open_composite(id, NodeKind::Sequence)
    }

    pub fn selector(self, id: NodeId) -> Self {
        self.open_composite(id, NodeKind::Selector)
    }

    pub fn parallel(self, id: NodeId) -> Self {
        self.open_composite(id, NodeKind::Parallel)
    }

    /// Attach a leaf to the innermost open composite.
    pub fn leaf(self, id: NodeId, action_id: u32, max_step: u32, params: Vec<Param>) -> Self {
        self.attach(BehaviorNode::action(id, action_id, max_step, params))
            .0
    }

    /// Close the innermost open composite.
    pub fn end(mut self) -> Self {
        if self.open.len() > 1 {
            self.open.pop();
        } else {
            self.fail(BuildError::UnbalancedEnd);
        }
        self
    }

    /// Finish the tree. Every opened composite must have been closed.
    pub fn build(self) -> Result<BehaviorTree, BuildError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match self.open.as_slice() {
            [_root] => Ok(self.tree),
            [.., innermost] => Err(BuildError::UnclosedComposite(*innermost)),
            [] => Err(BuildError::UnbalancedEnd),
        }
    }

    fn open_composite(self, id: NodeId, kind: NodeKind) -> Self {
        let (mut builder, attached) = self.attach(BehaviorNode::composite(id, kind));
        if attached {
            builder.open.push(id);
        }
        builder
    }

    fn attach(mut self, node: BehaviorNode) -> (Self, bool) {
        if self.error.is_some() {
            return (self, false);
        }
        let parent = self.open.last().copied().unwrap_or(ROOT_NODE_ID);
        match self.tree.add_child(parent, node) {
            Ok(()) => (self, true),
            Err(error) => {
                self.fail(error.into());
                (self, false)
            }
        }
    }

    fn fail(&mut self, error: BuildError) {
        self.error.get_or_insert(error);
    }
}

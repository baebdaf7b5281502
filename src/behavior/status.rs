//! Completion state and kind of behavior nodes.

use serde::{Deserialize, Serialize};

/// Completion state of a behavior node.
///
/// # Multi-tick Semantics
///
/// A node that is not completed after `execute` returns is resumed on the
/// next tick. `Succeeded` and `Failed` are terminal until the tree is reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeState {
    /// The node has not run yet.
    #[default]
    NotExecuted,

    /// The node has run and needs more ticks.
    Executing,

    /// The node finished successfully.
    Succeeded,

    /// The node finished unsuccessfully.
    Failed,
}

impl NodeState {
    /// Returns `true` for `Succeeded` and `Failed`.
    #[inline]
    pub fn is_completed(self) -> bool {
        matches!(self, NodeState::Succeeded | NodeState::Failed)
    }

    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, NodeState::Succeeded)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, NodeState::Failed)
    }
}

/// The closed set of node variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Leaf that runs a caller-supplied handler
    Action,
    /// Runs children one at a time until one fails
    Sequence,
    /// Runs children one at a time until one succeeds
    Selector,
    /// Runs all unfinished children every tick
    Parallel,
}

impl NodeKind {
    #[inline]
    pub fn is_composite(self) -> bool {
        !matches!(self, NodeKind::Action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_terminal_states_are_completed() {
        assert!(!NodeState::NotExecuted.is_completed());
        assert!(!NodeState::Executing.is_completed());
        assert!(NodeState::Succeeded.is_completed());
        assert!(NodeState::Failed.is_completed());
    }

    #[test]
    fn default_state_is_not_executed() {
        assert_eq!(NodeState::default(), NodeState::NotExecuted);
    }

    #[test]
    fn action_is_the_only_leaf_kind() {
        assert!(!NodeKind::Action.is_composite());
        assert!(NodeKind::Sequence.is_composite());
        assert!(NodeKind::Selector.is_composite());
        assert!(NodeKind::Parallel.is_composite());
    }

    #[test]
    fn state_serializes_by_name() {
        let json = serde_json::to_string(&NodeState::Executing).unwrap();
        assert_eq!(json, r#""Executing""#);
        let back: NodeState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NodeState::Executing);
    }
}

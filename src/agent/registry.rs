//! Leaf handlers keyed by action id.

use crate::agent::error::AgentError;
use crate::behavior::{ActionId, LeafHandler, NodeMeta, NodeState};
use crate::core::Param;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

type LeafFn = Box<dyn FnMut(&mut NodeMeta, &[Param]) -> NodeState>;

/// Routes each leaf to the handler registered for its action id.
///
/// A leaf whose action id has no handler reports `NotExecuted`. The first
/// such miss per action id is logged at `warn`, later ones at `debug`.
#[derive(Default)]
pub struct LeafRegistry {
    handlers: HashMap<ActionId, LeafFn>,
    missing: HashSet<ActionId>,
}

impl LeafRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `action_id`. Existing handlers are never
    /// replaced.
    pub fn register<F>(&mut self, action_id: ActionId, handler: F) -> Result<(), AgentError>
    where
        F: FnMut(&mut NodeMeta, &[Param]) -> NodeState + 'static,
    {
        if self.handlers.contains_key(&action_id) {
            return Err(AgentError::HandlerExists(action_id));
        }
        self.handlers.insert(action_id, Box::new(handler));
        self.missing.remove(&action_id);
        Ok(())
    }

    pub fn unregister(&mut self, action_id: ActionId) {
        self.handlers.remove(&action_id);
    }

    pub fn contains(&self, action_id: ActionId) -> bool {
        self.handlers.contains_key(&action_id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl LeafHandler for LeafRegistry {
    fn on_action(&mut self, node: &mut NodeMeta, params: &[Param]) -> NodeState {
        match self.handlers.get_mut(&node.action_id()) {
            Some(handler) => handler(node, params),
            None => {
                if self.missing.insert(node.action_id()) {
                    warn!(
                        target: "agentmind::agent",
                        node = node.id(),
                        action = node.action_id(),
                        "No leaf handler registered"
                    );
                } else {
                    debug!(
                        target: "agentmind::agent",
                        node = node.id(),
                        action = node.action_id(),
                        "Leaf still has no handler"
                    );
                }
                NodeState::NotExecuted
            }
        }
    }
}

impl fmt::Debug for LeafRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.handlers.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("LeafRegistry").field("actions", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{BehaviorNode, BehaviorTree, ROOT_NODE_ID};

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = LeafRegistry::new();
        registry
            .register(1, |_: &mut NodeMeta, _: &[Param]| NodeState::Succeeded)
            .unwrap();

        let result = registry.register(1, |_: &mut NodeMeta, _: &[Param]| NodeState::Failed);
        assert!(matches!(result, Err(AgentError::HandlerExists(1))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn leaves_route_by_action_id() {
        let mut registry = LeafRegistry::new();
        registry
            .register(1, |_: &mut NodeMeta, _: &[Param]| NodeState::Succeeded)
            .unwrap();
        registry
            .register(2, |_: &mut NodeMeta, _: &[Param]| NodeState::Failed)
            .unwrap();

        let mut tree = BehaviorTree::new(1);
        tree.add_child(ROOT_NODE_ID, BehaviorNode::action(10, 1, 0, vec![]))
            .unwrap();
        tree.add_child(ROOT_NODE_ID, BehaviorNode::action(11, 2, 0, vec![]))
            .unwrap();

        tree.execute(&mut registry);
        tree.execute(&mut registry);

        assert_eq!(tree.node_state(10), Some(NodeState::Succeeded));
        assert_eq!(tree.node_state(11), Some(NodeState::Failed));
        assert_eq!(tree.state(), NodeState::Failed);
    }

    #[test]
    fn missing_handler_reports_not_executed() {
        let mut registry = LeafRegistry::new();
        let mut tree = BehaviorTree::new(1);
        tree.add_child(ROOT_NODE_ID, BehaviorNode::action(10, 99, 0, vec![]))
            .unwrap();

        tree.execute(&mut registry);

        assert_eq!(tree.node_state(10), Some(NodeState::NotExecuted));
        assert!(!tree.is_completed());
    }

    #[test]
    fn missing_handler_is_reported_once_per_action() {
        let mut registry = LeafRegistry::new();
        let mut tree = BehaviorTree::new(1);
        tree.add_child(ROOT_NODE_ID, BehaviorNode::action(10, 99, 0, vec![]))
            .unwrap();

        for _ in 0..3 {
            tree.execute(&mut registry);
        }
        assert_eq!(registry.missing, HashSet::from([99]));

        registry
            .register(99, |_: &mut NodeMeta, _: &[Param]| NodeState::Succeeded)
            .unwrap();
        assert!(registry.missing.is_empty());

        tree.execute(&mut registry);
        assert_eq!(tree.state(), NodeState::Succeeded);
    }

    #[test]
    fn unregister_removes_handler() {
        let mut registry = LeafRegistry::new();
        registry
            .register(4, |_: &mut NodeMeta, _: &[Param]| NodeState::Succeeded)
            .unwrap();
        registry.unregister(4);
        assert!(!registry.contains(4));
        assert!(registry.is_empty());
    }
}

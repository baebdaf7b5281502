//! Behavior tree: an arena of nodes ticked from a sequence root.

use crate::behavior::error::TreeError;
use crate::behavior::node::{BehaviorNode, LeafHandler, NodeId, TreeId};
use crate::behavior::status::{NodeKind, NodeState};
use std::collections::HashMap;
use tracing::trace;

/// Reserved id of every tree's root node.
pub const ROOT_NODE_ID: NodeId = 1;

/// Rooted tree of behavior nodes.
///
/// Nodes live in slots owned by the tree and refer to their children by
/// slot, so removing a subtree never leaves a dangling reference. The root
/// is always a [`NodeKind::Sequence`] with id [`ROOT_NODE_ID`].
///
/// # Semantics
///
/// Each `execute` is one tick. Completed nodes are skipped, so a sequence
/// or selector advances at most one child per tick and resumes where it
/// left off on the next. A completed root makes `execute` a no-op until
/// [`reset`](Self::reset) is called.
#[derive(Clone, Debug)]
pub struct BehaviorTree {
    id: TreeId,
    slots: Vec<Option<BehaviorNode>>,
    free: Vec<usize>,
    index: HashMap<NodeId, usize>,
    root: usize,
}

impl BehaviorTree {
    /// Create a tree holding only its root sequence.
    pub fn new(id: TreeId) -> Self {
        let mut index = HashMap::new();
        index.insert(ROOT_NODE_ID, 0);
        Self {
            id,
            slots: vec![Some(BehaviorNode::sequence(ROOT_NODE_ID))],
            free: Vec::new(),
            index,
            root: 0,
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn root_id(&self) -> NodeId {
        ROOT_NODE_ID
    }

    pub fn root(&self) -> Option<&BehaviorNode> {
        self.slot(self.root)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always `false`: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&BehaviorNode> {
        self.index.get(&id).and_then(|&slot| self.slot(slot))
    }

    pub fn node_state(&self, id: NodeId) -> Option<NodeState> {
        self.node(id).map(BehaviorNode::state)
    }

    /// Ids of `parent`'s children in execution order.
    pub fn children(&self, parent: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let node = self.node(parent).ok_or(TreeError::NodeNotFound(parent))?;
        Ok(node
            .child_slots()
            .iter()
            .filter_map(|&slot| self.slot(slot).map(BehaviorNode::id))
            .collect())
    }

    /// The child of `parent` with id `child`, if it is a direct child.
    pub fn child(&self, parent: NodeId, child: NodeId) -> Option<&BehaviorNode> {
        let parent_slot = *self.index.get(&parent)?;
        let child_slot = *self.index.get(&child)?;
        let node = self.slot(child_slot)?;
        (node.parent() == Some(parent_slot)).then_some(node)
    }

    /// Append `node` as the last child of the composite `parent`.
    ///
    /// `node` must be freshly constructed. A node copied out of a tree
    /// still refers to that tree's slots and is rejected with
    /// [`TreeError::AttachedNode`].
    pub fn add_child(&mut self, parent: NodeId, node: BehaviorNode) -> Result<(), TreeError> {
        let id = node.id();
        if !node.is_detached() {
            return Err(TreeError::AttachedNode(id));
        }
        if self.index.contains_key(&id) {
            return Err(TreeError::DuplicateNode(id));
        }
        let parent_slot = *self
            .index
            .get(&parent)
            .ok_or(TreeError::NodeNotFound(parent))?;
        let composite = self
            .slot(parent_slot)
            .is_some_and(|parent| parent.kind().is_composite());
        if !composite {
            return Err(TreeError::NotComposite(parent));
        }

        let mut node = node;
        node.set_parent(parent_slot);
        let slot = self.allocate(node);
        self.index.insert(id, slot);
        if let Some(children) = self.slot_mut(parent_slot).and_then(BehaviorNode::child_slots_mut) {
            children.push(slot);
        }
        Ok(())
    }

    /// Detach the direct child `child` of `parent` and drop its subtree.
    /// Does nothing if `child` is not a direct child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.child(parent, child).is_some() {
            self.detach(child);
        }
    }

    /// Detach `id` from wherever it sits and drop its subtree.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == ROOT_NODE_ID {
            return Err(TreeError::RootRemoval);
        }
        self.detach(id);
        Ok(())
    }

    /// Tick the tree once from the root.
    pub fn execute<H>(&mut self, handler: &mut H)
    where
        H: LeafHandler + ?Sized,
    {
        if self.is_completed() {
            return;
        }
        self.execute_slot(self.root, handler);

        if self.is_completed() {
            trace!(
                target: "agentmind::behavior",
                tree = self.id,
                state = ?self.state(),
                "Behavior tree completed"
            );
        }
    }

    /// State of the root node.
    pub fn state(&self) -> NodeState {
        self.state_of(self.root)
    }

    pub fn is_completed(&self) -> bool {
        self.state().is_completed()
    }

    /// Return every node to `NotExecuted` with a zero step counter.
    pub fn reset(&mut self) {
        for node in self.slots.iter_mut().flatten() {
            node.meta_mut().reset();
        }
    }

    fn slot(&self, slot: usize) -> Option<&BehaviorNode> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, slot: usize) -> Option<&mut BehaviorNode> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn allocate(&mut self, node: BehaviorNode) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(&slot) = self.index.get(&id) else {
            return;
        };
        let parent = self.slot(slot).and_then(BehaviorNode::parent);
        if let Some(children) = parent
            .and_then(|parent| self.slot_mut(parent))
            .and_then(BehaviorNode::child_slots_mut)
        {
            children.retain(|&child| child != slot);
        }

        let mut pending = vec![slot];
        while let Some(slot) = pending.pop() {
            if let Some(node) = self.slots.get_mut(slot).and_then(Option::take) {
                pending.extend_from_slice(node.child_slots());
                self.index.remove(&node.id());
                self.free.push(slot);
            }
        }
    }

    fn kind_of(&self, slot: usize) -> Option<NodeKind> {
        self.slot(slot).map(BehaviorNode::kind)
    }

    fn state_of(&self, slot: usize) -> NodeState {
        self.slot(slot)
            .map(BehaviorNode::state)
            .unwrap_or(NodeState::NotExecuted)
    }

    fn set_state(&mut self, slot: usize, state: NodeState) {
        if let Some(node) = self.slot_mut(slot) {
            node.meta_mut().set_state(state);
        }
    }

    fn child_at(&self, slot: usize, position: usize) -> Option<usize> {
        self.slot(slot)
            .and_then(|node| node.child_slots().get(position).copied())
    }

    fn child_count(&self, slot: usize) -> usize {
        self.slot(slot).map_or(0, |node| node.child_slots().len())
    }

    fn execute_slot<H>(&mut self, slot: usize, handler: &mut H)
    where
        H: LeafHandler + ?Sized,
    {
        if self.state_of(slot).is_completed() {
            return;
        }
        match self.kind_of(slot) {
            Some(NodeKind::Action) => {
                if let Some(node) = self.slot_mut(slot) {
                    node.execute_leaf(handler);
                }
            }
            Some(NodeKind::Sequence) => self.execute_ordered(slot, NodeState::Failed, handler),
            Some(NodeKind::Selector) => self.execute_ordered(slot, NodeState::Succeeded, handler),
            Some(NodeKind::Parallel) => self.execute_parallel(slot, handler),
            None => {}
        }
    }

    /// Shared body of sequence and selector.
    ///
    /// Progress is made on the first unfinished child only. A child ending
    /// in `decisive` ends the composite the same way; otherwise the
    /// composite takes the last child's outcome.
    fn execute_ordered<H>(&mut self, slot: usize, decisive: NodeState, handler: &mut H)
    where
        H: LeafHandler + ?Sized,
    {
        self.set_state(slot, NodeState::Executing);

        let count = self.child_count(slot);
        for position in 0..count {
            let Some(child) = self.child_at(slot, position) else {
                break;
            };
            if self.state_of(child).is_completed() {
                continue;
            }

            self.execute_slot(child, handler);
            let outcome = self.state_of(child);
            if !outcome.is_completed() {
                break;
            }

            if outcome == decisive {
                self.set_state(slot, decisive);
            } else if position + 1 == count {
                self.set_state(slot, outcome);
            }
            break;
        }
    }

    fn execute_parallel<H>(&mut self, slot: usize, handler: &mut H)
    where
        H: LeafHandler + ?Sized,
    {
        self.set_state(slot, NodeState::Executing);

        let mut finished = true;
        let count = self.child_count(slot);
        for position in 0..count {
            let Some(child) = self.child_at(slot, position) else {
                break;
            };
            if self.state_of(child).is_completed() {
                continue;
            }

            self.execute_slot(child, handler);
            let outcome = self.state_of(child);
            if !outcome.is_completed() {
                finished = false;
                continue;
            }
            if outcome == NodeState::Failed {
                self.set_state(slot, NodeState::Failed);
                break;
            }
        }

        if finished && self.state_of(slot) == NodeState::Executing {
            self.set_state(slot, NodeState::Succeeded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::node::{ActionId, NodeMeta};
    use crate::core::Param;
    use std::collections::VecDeque;

    /// Handler that replays scripted outcomes per action id and records
    /// which node ran on which tick.
    #[derive(Default)]
    struct Script {
        outcomes: HashMap<ActionId, VecDeque<NodeState>>,
        ran: Vec<NodeId>,
    }

    impl Script {
        fn with(mut self, action: ActionId, outcomes: &[NodeState]) -> Self {
            self.outcomes.insert(action, outcomes.iter().copied().collect());
            self
        }

        fn take_ran(&mut self) -> Vec<NodeId> {
            std::mem::take(&mut self.ran)
        }
    }

    impl LeafHandler for Script {
        fn on_action(&mut self, node: &mut NodeMeta, _: &[Param]) -> NodeState {
            self.ran.push(node.id());
            node.update_step();
            let queue = self.outcomes.entry(node.action_id()).or_default();
            if queue.len() > 1 {
                queue.pop_front().unwrap_or(NodeState::Executing)
            } else {
                queue.front().copied().unwrap_or(NodeState::Executing)
            }
        }
    }

    use crate::behavior::NodeState::{Executing, Failed, Succeeded};

    /// Composite `kind` with id 10 under the root and leaves 11, 12, 13
    /// bound to action ids 1, 2, 3.
    fn three_leaves(kind: NodeKind) -> BehaviorTree {
        let mut tree = BehaviorTree::new(1);
        tree.add_child(ROOT_NODE_ID, BehaviorNode::composite(10, kind))
            .unwrap();
        for (id, action) in [(11, 1), (12, 2), (13, 3)] {
            tree.add_child(10, BehaviorNode::action(id, action, 0, vec![]))
                .unwrap();
        }
        tree
    }

    #[test]
    fn new_tree_has_sequence_root() {
        let tree = BehaviorTree::new(5);
        assert_eq!(tree.id(), 5);
        let root = tree.root().unwrap();
        assert_eq!(root.id(), ROOT_NODE_ID);
        assert_eq!(root.kind(), NodeKind::Sequence);
        assert_eq!(tree.state(), NodeState::NotExecuted);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn add_child_validates_ids_and_parents() {
        let mut tree = BehaviorTree::new(1);
        tree.add_child(ROOT_NODE_ID, BehaviorNode::action(2, 1, 0, vec![]))
            .unwrap();

        assert_eq!(
            tree.add_child(ROOT_NODE_ID, BehaviorNode::action(2, 1, 0, vec![])),
            Err(TreeError::DuplicateNode(2))
        );
        assert_eq!(
            tree.add_child(99, BehaviorNode::sequence(3)),
            Err(TreeError::NodeNotFound(99))
        );
        assert_eq!(
            tree.add_child(2, BehaviorNode::sequence(3)),
            Err(TreeError::NotComposite(2))
        );
        assert_eq!(tree.children(ROOT_NODE_ID), Ok(vec![2]));
    }

    #[test]
    fn remove_child_drops_whole_subtree() {
        let mut tree = three_leaves(NodeKind::Sequence);
        tree.add_child(ROOT_NODE_ID, BehaviorNode::action(20, 9, 0, vec![]))
            .unwrap();
        tree.remove_child(ROOT_NODE_ID, 10);

        assert_eq!(tree.len(), 2);
        assert!(!tree.contains(11));
        assert_eq!(tree.children(ROOT_NODE_ID), Ok(vec![20]));
    }

    #[test]
    fn remove_child_ignores_non_children() {
        let mut tree = three_leaves(NodeKind::Sequence);
        tree.remove_child(ROOT_NODE_ID, 11);
        tree.remove_child(ROOT_NODE_ID, 404);

        assert_eq!(tree.children(10), Ok(vec![11, 12, 13]));
    }

    #[test]
    fn remove_node_detaches_from_parent() {
        let mut tree = three_leaves(NodeKind::Sequence);
        tree.remove_node(12).unwrap();

        assert_eq!(tree.children(10), Ok(vec![11, 13]));
        assert_eq!(tree.remove_node(ROOT_NODE_ID), Err(TreeError::RootRemoval));
        assert!(tree.remove_node(12).is_ok());
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut tree = three_leaves(NodeKind::Sequence);
        let before = tree.slots.len();
        tree.remove_node(13).unwrap();
        tree.add_child(10, BehaviorNode::action(14, 4, 0, vec![]))
            .unwrap();

        assert_eq!(tree.slots.len(), before);
        assert_eq!(tree.children(10), Ok(vec![11, 12, 14]));
    }

    #[test]
    fn nodes_copied_from_another_tree_are_rejected() {
        let donor = three_leaves(NodeKind::Sequence);
        let mut tree = BehaviorTree::new(2);
        tree.add_child(ROOT_NODE_ID, BehaviorNode::parallel(20))
            .unwrap();
        tree.add_child(20, BehaviorNode::action(21, 1, 0, vec![]))
            .unwrap();

        let composite = donor.node(10).cloned().unwrap();
        assert_eq!(
            tree.add_child(ROOT_NODE_ID, composite),
            Err(TreeError::AttachedNode(10))
        );
        let leaf = donor.node(11).cloned().unwrap();
        assert_eq!(
            tree.add_child(20, leaf),
            Err(TreeError::AttachedNode(11))
        );

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.children(20), Ok(vec![21]));
    }

    #[test]
    fn executed_root_copy_is_rejected() {
        let mut donor = BehaviorTree::new(1);
        donor.execute(&mut Script::default());
        let root = donor.root().cloned().unwrap();
        assert_eq!(root.state(), Executing);

        let mut tree = BehaviorTree::new(2);
        assert_eq!(
            tree.add_child(ROOT_NODE_ID, root),
            Err(TreeError::AttachedNode(ROOT_NODE_ID))
        );
    }

    #[test]
    fn cloned_tree_keeps_its_own_structure() {
        let original = three_leaves(NodeKind::Sequence);
        let mut copy = original.clone();
        copy.remove_node(12).unwrap();

        assert_eq!(original.children(10), Ok(vec![11, 12, 13]));
        assert_eq!(copy.children(10), Ok(vec![11, 13]));
    }

    #[test]
    fn child_lookup_requires_direct_parent() {
        let tree = three_leaves(NodeKind::Sequence);
        assert!(tree.child(10, 11).is_some());
        assert!(tree.child(ROOT_NODE_ID, 11).is_none());
    }

    #[test]
    fn sequence_advances_one_child_per_tick() {
        let mut tree = three_leaves(NodeKind::Sequence);
        let mut script = Script::default()
            .with(1, &[Succeeded])
            .with(2, &[Succeeded])
            .with(3, &[Succeeded]);

        tree.execute(&mut script);
        assert_eq!(script.take_ran(), vec![11]);
        assert_eq!(tree.node_state(12), Some(NodeState::NotExecuted));
        assert_eq!(tree.node_state(13), Some(NodeState::NotExecuted));
        assert_eq!(tree.node_state(10), Some(Executing));

        tree.execute(&mut script);
        assert_eq!(script.take_ran(), vec![12]);

        tree.execute(&mut script);
        assert_eq!(script.take_ran(), vec![13]);
        assert_eq!(tree.node_state(10), Some(Succeeded));
        assert_eq!(tree.state(), Succeeded);
    }

    #[test]
    fn sequence_resumes_executing_child() {
        let mut tree = three_leaves(NodeKind::Sequence);
        let mut script = Script::default()
            .with(1, &[Executing, Executing, Succeeded])
            .with(2, &[Succeeded]);

        for _ in 0..3 {
            tree.execute(&mut script);
        }
        assert_eq!(script.take_ran(), vec![11, 11, 11]);
        assert_eq!(tree.node(11).map(BehaviorNode::step), Some(3));

        tree.execute(&mut script);
        assert_eq!(script.take_ran(), vec![12]);
    }

    #[test]
    fn sequence_fails_on_first_failure() {
        let mut tree = three_leaves(NodeKind::Sequence);
        let mut script = Script::default()
            .with(1, &[Succeeded])
            .with(2, &[Failed]);

        tree.execute(&mut script);
        tree.execute(&mut script);
        assert_eq!(tree.node_state(10), Some(Failed));
        assert_eq!(tree.state(), Failed);

        tree.execute(&mut script);
        assert_eq!(script.take_ran(), vec![11, 12]);
        assert_eq!(tree.node_state(13), Some(NodeState::NotExecuted));
    }

    #[test]
    fn selector_succeeds_on_first_success() {
        let mut tree = three_leaves(NodeKind::Selector);
        let mut script = Script::default()
            .with(1, &[Failed])
            .with(2, &[Succeeded]);

        tree.execute(&mut script);
        assert_eq!(tree.node_state(10), Some(Executing));

        tree.execute(&mut script);
        assert_eq!(tree.node_state(10), Some(Succeeded));
        assert_eq!(script.take_ran(), vec![11, 12]);
        assert_eq!(tree.node_state(13), Some(NodeState::NotExecuted));
    }

    #[test]
    fn selector_fails_only_on_last_child() {
        let mut tree = three_leaves(NodeKind::Selector);
        let mut script = Script::default()
            .with(1, &[Failed])
            .with(2, &[Failed])
            .with(3, &[Failed]);

        tree.execute(&mut script);
        tree.execute(&mut script);
        assert_eq!(tree.node_state(10), Some(Executing));

        tree.execute(&mut script);
        assert_eq!(tree.node_state(10), Some(Failed));
    }

    #[test]
    fn parallel_runs_all_children_each_tick() {
        let mut tree = three_leaves(NodeKind::Parallel);
        let mut script = Script::default()
            .with(1, &[Succeeded])
            .with(2, &[Executing, Succeeded])
            .with(3, &[Executing, Executing, Succeeded]);

        tree.execute(&mut script);
        assert_eq!(script.take_ran(), vec![11, 12, 13]);
        assert_eq!(tree.node_state(10), Some(Executing));

        tree.execute(&mut script);
        assert_eq!(script.take_ran(), vec![12, 13]);

        tree.execute(&mut script);
        assert_eq!(script.take_ran(), vec![13]);
        assert_eq!(tree.node_state(10), Some(Succeeded));
    }

    #[test]
    fn parallel_fails_early_without_running_later_children() {
        let mut tree = three_leaves(NodeKind::Parallel);
        let mut script = Script::default()
            .with(1, &[Executing])
            .with(2, &[Failed])
            .with(3, &[Succeeded]);

        tree.execute(&mut script);

        assert_eq!(tree.node_state(10), Some(Failed));
        assert_eq!(script.take_ran(), vec![11, 12]);
        assert_eq!(tree.node_state(13), Some(NodeState::NotExecuted));
    }

    #[test]
    fn empty_composites() {
        let mut script = Script::default();

        let mut sequence = BehaviorTree::new(1);
        sequence.execute(&mut script);
        assert_eq!(sequence.state(), Executing);

        let mut parallel = BehaviorTree::new(2);
        parallel
            .add_child(ROOT_NODE_ID, BehaviorNode::parallel(2))
            .unwrap();
        parallel
            .add_child(ROOT_NODE_ID, BehaviorNode::action(3, 1, 0, vec![]))
            .unwrap();
        script = script.with(1, &[Succeeded]);

        parallel.execute(&mut script);
        assert_eq!(parallel.node_state(2), Some(Succeeded));
        assert_eq!(parallel.state(), Executing);
    }

    #[test]
    fn completed_tree_is_untouched_by_execute() {
        let mut tree = three_leaves(NodeKind::Selector);
        let mut script = Script::default().with(1, &[Succeeded]);
        tree.execute(&mut script);
        assert!(tree.is_completed());

        let snapshot: Vec<_> = [10, 11, 12, 13]
            .iter()
            .map(|&id| tree.node(id).cloned())
            .collect();
        script.take_ran();

        tree.execute(&mut script);
        tree.execute(&mut script);

        let after: Vec<_> = [10, 11, 12, 13]
            .iter()
            .map(|&id| tree.node(id).cloned())
            .collect();
        assert_eq!(snapshot, after);
        assert!(script.take_ran().is_empty());
    }

    #[test]
    fn handler_may_report_not_executed() {
        let mut tree = BehaviorTree::new(1);
        tree.add_child(ROOT_NODE_ID, BehaviorNode::action(2, 1, 0, vec![]))
            .unwrap();
        let mut skip = |_: &mut NodeMeta, _: &[Param]| NodeState::NotExecuted;

        tree.execute(&mut skip);
        assert_eq!(tree.node_state(2), Some(NodeState::NotExecuted));
        assert_eq!(tree.state(), Executing);
    }

    #[test]
    fn reset_restores_initial_states() {
        let mut tree = three_leaves(NodeKind::Sequence);
        let mut script = Script::default().with(1, &[Failed]);
        tree.execute(&mut script);
        assert!(tree.is_completed());

        tree.reset();

        assert_eq!(tree.state(), NodeState::NotExecuted);
        assert_eq!(tree.node_state(11), Some(NodeState::NotExecuted));
        assert_eq!(tree.node(11).map(BehaviorNode::step), Some(0));

        tree.execute(&mut script);
        assert_eq!(script.take_ran(), vec![11, 11]);
    }
}

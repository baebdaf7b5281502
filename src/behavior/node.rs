//! Behavior nodes and the leaf handler capability.
//!
//! A node is a [`NodeMeta`] header plus a body. Leaves carry the parameters
//! bound to them; composites carry their children as slots in the owning
//! tree's arena, so a node only gains children through
//! [`BehaviorTree::add_child`](crate::behavior::BehaviorTree::add_child).

use crate::behavior::status::{NodeKind, NodeState};
use crate::core::Param;

/// Identifier of a node, unique within one tree.
pub type NodeId = u32;

/// Identifier a leaf uses to select its handler.
pub type ActionId = u32;

/// Identifier of a tree.
pub type TreeId = u32;

/// Header shared by every node variant.
///
/// Leaf handlers receive it mutably. They may advance the step counter;
/// the node's state is only set from the handler's return value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeMeta {
    id: NodeId,
    kind: NodeKind,
    action_id: ActionId,
    state: NodeState,
    step: u32,
    max_step: u32,
}

impl NodeMeta {
    fn new(id: NodeId, kind: NodeKind, action_id: ActionId, max_step: u32) -> Self {
        Self {
            id,
            kind,
            action_id,
            state: NodeState::NotExecuted,
            step: 0,
            max_step,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Handler id for leaves, `0` for composites.
    pub fn action_id(&self) -> ActionId {
        self.action_id
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Step cap for step-limited actions. Composites never consult it.
    pub fn max_step(&self) -> u32 {
        self.max_step
    }

    /// Advance the step counter by one, saturating at `u32::MAX`.
    pub fn update_step(&mut self) {
        self.step = self.step.saturating_add(1);
    }

    /// `true` once `step` has reached a non-zero `max_step`.
    pub fn steps_exhausted(&self) -> bool {
        self.max_step > 0 && self.step >= self.max_step
    }

    pub(crate) fn set_state(&mut self, state: NodeState) {
        self.state = state;
    }

    pub(crate) fn reset(&mut self) {
        self.state = NodeState::NotExecuted;
        self.step = 0;
    }
}

/// Capability that runs leaf actions.
///
/// Any `FnMut(&mut NodeMeta, &[Param]) -> NodeState` closure is a handler.
///
/// # Example
///
/// ```rust
/// use agentmind::behavior::{BehaviorNode, BehaviorTree, NodeMeta, NodeState};
/// use agentmind::core::Param;
///
/// let mut tree = BehaviorTree::new(1);
/// tree.add_child(tree.root_id(), BehaviorNode::action(2, 10, 3, vec![]))
///     .unwrap();
///
/// // Succeed after three ticks.
/// let mut walk = |node: &mut NodeMeta, _: &[Param]| {
///     node.update_step();
///     if node.steps_exhausted() {
///         NodeState::Succeeded
///     } else {
///         NodeState::Executing
///     }
/// };
///
/// tree.execute(&mut walk);
/// tree.execute(&mut walk);
/// assert!(!tree.is_completed());
/// tree.execute(&mut walk);
/// assert_eq!(tree.state(), NodeState::Succeeded);
/// ```
pub trait LeafHandler {
    /// Run the leaf `node` with its bound `params` and report its new state.
    fn on_action(&mut self, node: &mut NodeMeta, params: &[Param]) -> NodeState;
}

impl<F> LeafHandler for F
where
    F: FnMut(&mut NodeMeta, &[Param]) -> NodeState,
{
    fn on_action(&mut self, node: &mut NodeMeta, params: &[Param]) -> NodeState {
        self(node, params)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum NodeBody {
    Leaf { params: Vec<Param> },
    Composite { children: Vec<usize> },
}

/// A node stored in a [`BehaviorTree`](crate::behavior::BehaviorTree).
///
/// Cloning copies the node's arena links along with it, so a clone is only
/// meaningful inside a clone of the same tree.
#[derive(Clone, Debug, PartialEq)]
pub struct BehaviorNode {
    meta: NodeMeta,
    parent: Option<usize>,
    body: NodeBody,
}

impl BehaviorNode {
    /// Leaf resolved to a handler by `action_id`, with `params` bound to it.
    pub fn action(id: NodeId, action_id: ActionId, max_step: u32, params: Vec<Param>) -> Self {
        Self {
            meta: NodeMeta::new(id, NodeKind::Action, action_id, max_step),
            parent: None,
            body: NodeBody::Leaf { params },
        }
    }

    /// Composite that runs its children in order until one fails.
    pub fn sequence(id: NodeId) -> Self {
        Self::composite(id, NodeKind::Sequence)
    }

    /// Composite that runs its children in order until one succeeds.
    pub fn selector(id: NodeId) -> Self {
        Self::composite(id, NodeKind::Selector)
    }

    /// Composite that ticks all unfinished children each tick.
    pub fn parallel(id: NodeId) -> Self {
        Self::composite(id, NodeKind::Parallel)
    }

    /// Composite of the given kind. `NodeKind::Action` yields a leaf with
    /// action id `0` and no parameters.
    pub fn composite(id: NodeId, kind: NodeKind) -> Self {
        if !kind.is_composite() {
            return Self::action(id, 0, 0, Vec::new());
        }
        Self {
            meta: NodeMeta::new(id, kind, 0, 0),
            parent: None,
            body: NodeBody::Composite {
                children: Vec::new(),
            },
        }
    }

    /// Header shared with leaf handlers.
    pub fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    pub fn id(&self) -> NodeId {
        self.meta.id
    }

    pub fn kind(&self) -> NodeKind {
        self.meta.kind
    }

    /// Outcome recorded on the last tick.
    pub fn state(&self) -> NodeState {
        self.meta.state
    }

    /// `true` once the node has succeeded or failed.
    pub fn is_completed(&self) -> bool {
        self.meta.is_completed()
    }

    /// Steps advanced by the handler since the last reset.
    pub fn step(&self) -> u32 {
        self.meta.step
    }

    /// Parameters bound to a leaf; empty for composites.
    pub fn params(&self) -> &[Param] {
        match &self.body {
            NodeBody::Leaf { params } => params,
            NodeBody::Composite { .. } => &[],
        }
    }

    /// True for a node that has never been placed in a tree: no parent,
    /// no children and untouched state.
    pub(crate) fn is_detached(&self) -> bool {
        self.parent.is_none()
            && self.child_slots().is_empty()
            && self.meta.state == NodeState::NotExecuted
            && self.meta.step == 0
    }

    pub(crate) fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }

    pub(crate) fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: usize) {
        self.parent = Some(parent);
    }

    pub(crate) fn child_slots(&self) -> &[usize] {
        match &self.body {
            NodeBody::Composite { children } => children,
            NodeBody::Leaf { .. } => &[],
        }
    }

    pub(crate) fn child_slots_mut(&mut self) -> Option<&mut Vec<usize>> {
        match &mut self.body {
            NodeBody::Composite { children } => Some(children),
            NodeBody::Leaf { .. } => None,
        }
    }

    /// Run a leaf's handler unless the leaf already completed.
    pub(crate) fn execute_leaf<H>(&mut self, handler: &mut H)
    where
        H: LeafHandler + ?Sized,
    {
        if self.meta.is_completed() {
            return;
        }
        if let NodeBody::Leaf { params } = &self.body {
            let state = handler.on_action(&mut self.meta, params);
            self.meta.state = state;
        }
    }
}

//! Closure-based agent that wires a state machine to behavior trees.

use crate::agent::config::AgentConfig;
use crate::agent::error::AgentError;
use crate::agent::registry::LeafRegistry;
use crate::behavior::{ActionId, BehaviorTree, NodeMeta, NodeState};
use crate::core::{Param, State};
use crate::fsm::{Fsm, Triggered};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// A game agent ticked once per frame.
pub trait Agent {
    fn id(&self) -> u32;

    fn update(&mut self, dt: i64);
}

type EnterFn = Box<dyn FnMut(&str)>;
type UpdateFn = Box<dyn FnMut(i64)>;
type ExitFn = Box<dyn FnMut(&str)>;

/// Optional closures run by a state's lifecycle hooks.
///
/// A state with an update closure runs it instead of its behavior tree.
#[derive(Default)]
pub struct StateHooks {
    enter: Option<EnterFn>,
    update: Option<UpdateFn>,
    exit: Option<ExitFn>,
}

impl StateHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        self.enter = Some(Box::new(f));
        self
    }

    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: FnMut(i64) + 'static,
    {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_exit<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        self.exit = Some(Box::new(f));
        self
    }
}

struct AgentState {
    hooks: StateHooks,
    tree: Option<Rc<RefCell<BehaviorTree>>>,
    leaves: Rc<RefCell<LeafRegistry>>,
    reset_tree_on_enter: bool,
}

impl State for AgentState {
    fn on_enter(&mut self, from: &str) {
        if self.reset_tree_on_enter {
            if let Some(tree) = &self.tree {
                tree.borrow_mut().reset();
            }
        }
        if let Some(enter) = self.hooks.enter.as_mut() {
            enter(from);
        }
    }

    fn on_update(&mut self, dt: i64) {
        if let Some(update) = self.hooks.update.as_mut() {
            update(dt);
        } else if let Some(tree) = &self.tree {
            tree.borrow_mut().execute(&mut *self.leaves.borrow_mut());
        }
    }

    fn on_exit(&mut self, to: &str) {
        if let Some(exit) = self.hooks.exit.as_mut() {
            exit(to);
        }
    }
}

/// Agent whose states, gates and leaves are plain closures.
///
/// Each state may own a behavior tree, which is ticked by `update` while
/// the state is current. Leaves in every tree resolve their handler by
/// action id through one shared registry.
///
/// # Example
///
/// ```rust
/// use agentmind::agent::{Agent, AgentConfig, BaseAgent, StateHooks};
/// use agentmind::behavior::{NodeMeta, NodeState};
/// use agentmind::builder::sequence_of;
/// use agentmind::core::Param;
///
/// const LOOK_AROUND: u32 = 1;
///
/// let mut agent = BaseAgent::new(42, AgentConfig::default());
/// agent
///     .add_leaf_handler(LOOK_AROUND, |_: &mut NodeMeta, _: &[Param]| NodeState::Succeeded)
///     .unwrap();
/// agent
///     .add_state(
///         "agent_state_idle",
///         Some(sequence_of(1, &[(2, LOOK_AROUND)]).unwrap()),
///         StateHooks::new(),
///     )
///     .unwrap();
///
/// agent.start().unwrap();
/// agent.update(16);
///
/// let tree = agent.tree("agent_state_idle").unwrap();
/// assert_eq!(tree.state(), NodeState::Succeeded);
/// ```
pub struct BaseAgent {
    id: u32,
    config: AgentConfig,
    fsm: Fsm,
    trees: HashMap<String, Rc<RefCell<BehaviorTree>>>,
    leaves: Rc<RefCell<LeafRegistry>>,
}

impl BaseAgent {
    pub fn new(id: u32, config: AgentConfig) -> Self {
        Self {
            id,
            config,
            fsm: Fsm::new(id),
            trees: HashMap::new(),
            leaves: Rc::new(RefCell::new(LeafRegistry::new())),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn fsm(&self) -> &Fsm {
        &self.fsm
    }

    pub fn current_state(&self) -> Option<&str> {
        self.fsm.current_state()
    }

    /// Register a state with an optional behavior tree and hook closures.
    pub fn add_state(
        &mut self,
        name: &str,
        tree: Option<BehaviorTree>,
        hooks: StateHooks,
    ) -> Result<(), AgentError> {
        let tree = tree.map(|tree| Rc::new(RefCell::new(tree)));
        let state = AgentState {
            hooks,
            tree: tree.clone(),
            leaves: Rc::clone(&self.leaves),
            reset_tree_on_enter: self.config.reset_tree_on_enter,
        };
        self.fsm.add_state(name, state)?;

        match tree {
            Some(tree) => {
                self.trees.insert(name.to_string(), tree);
            }
            None => {
                self.trees.remove(name);
            }
        }
        Ok(())
    }

    pub fn remove_state(&mut self, name: &str) {
        self.fsm.remove_state(name);
        self.trees.remove(name);
    }

    /// Behavior tree owned by state `name`.
    pub fn tree(&self, name: &str) -> Option<Ref<'_, BehaviorTree>> {
        self.trees.get(name).map(|tree| tree.borrow())
    }

    /// Register a transition gate.
    pub fn add_action<F>(&mut self, name: &str, gate: F) -> Result<(), AgentError>
    where
        F: FnMut(&str, &[Param]) -> bool + 'static,
    {
        Ok(self.fsm.add_action(name, gate)?)
    }

    pub fn remove_action(&mut self, name: &str) {
        self.fsm.remove_action(name);
    }

    pub fn add_transition(
        &mut self,
        from: &str,
        event: &str,
        to: &str,
        action: &str,
    ) -> Result<(), AgentError> {
        Ok(self.fsm.add_transition(from, event, to, action)?)
    }

    pub fn remove_transition(&mut self, from: &str, event: &str) {
        self.fsm.remove_transition(from, event);
    }

    /// Register the handler run by every leaf bound to `action_id`.
    pub fn add_leaf_handler<F>(&mut self, action_id: ActionId, handler: F) -> Result<(), AgentError>
    where
        F: FnMut(&mut NodeMeta, &[Param]) -> NodeState + 'static,
    {
        self.leaves.borrow_mut().register(action_id, handler)
    }

    /// Enter the configured initial state.
    pub fn start(&mut self) -> Result<(), AgentError> {
        let initial = self.config.initial_state.clone();
        self.start_in(&initial)
    }

    pub fn start_in(&mut self, state: &str) -> Result<(), AgentError> {
        Ok(self.fsm.start(state)?)
    }

    pub fn stop(&mut self) {
        self.fsm.stop();
    }

    pub fn trigger(&mut self, event: &str, params: &[Param]) -> Result<Triggered, AgentError> {
        Ok(self.fsm.trigger(event, params)?)
    }

    pub fn pop_state(&mut self) -> Result<(), AgentError> {
        Ok(self.fsm.pop_state()?)
    }
}

impl Agent for BaseAgent {
    fn id(&self) -> u32 {
        self.id
    }

    fn update(&mut self, dt: i64) {
        self.fsm.update(dt);
    }
}

//! Finite-state machine with gated transitions and a history stack.

use crate::core::{Action, Param, State, StateHistory};
use crate::fsm::error::FsmError;
use crate::fsm::transition::Transition;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Outcome of a trigger that found a matching transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Triggered {
    /// The machine moved to the transition's target state
    Transitioned,
    /// The gating action refused; nothing changed
    Vetoed,
}

/// Named states, named gating actions, a transition table and a history
/// stack.
///
/// The machine is driven entirely by the caller: `update` once per tick,
/// `trigger` on game events, `pop_state` to return to the previous state.
///
/// # Example
///
/// ```rust
/// use agentmind::core::NoopState;
/// use agentmind::fsm::{Fsm, Triggered};
///
/// let mut fsm = Fsm::new(7);
/// fsm.add_state("Idle", NoopState).unwrap();
/// fsm.add_state("Alert", NoopState).unwrap();
/// fsm.add_transition("Idle", "noise", "Alert", "").unwrap();
///
/// fsm.start("Idle").unwrap();
/// assert_eq!(fsm.trigger("noise", &[]), Ok(Triggered::Transitioned));
/// assert_eq!(fsm.current_state(), Some("Alert"));
///
/// fsm.pop_state().unwrap();
/// assert_eq!(fsm.current_state(), Some("Idle"));
/// ```
pub struct Fsm {
    id: u32,
    current: Option<String>,
    history: StateHistory,
    states: HashMap<String, Box<dyn State>>,
    actions: HashMap<String, Box<dyn Action>>,
    transitions: Vec<Transition>,
}

impl Fsm {
    /// Create an empty machine owned by agent `id`.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            current: None,
            history: StateHistory::new(),
            states: HashMap::new(),
            actions: HashMap::new(),
            transitions: Vec::new(),
        }
    }

    /// Machine id, usually the owning agent's id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Name of the active state, `None` until `start` succeeds.
    pub fn current_state(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// States left through accepted transitions, most recent last.
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Register `state` under `name`, replacing any previous entry.
    pub fn add_state<S>(&mut self, name: impl Into<String>, state: S) -> Result<(), FsmError>
    where
        S: State + 'static,
    {
        self.add_state_opt(name, Some(Box::new(state)))
    }

    /// Register a state that may be absent, for callers resolving states
    /// dynamically.
    pub fn add_state_opt(
        &mut self,
        name: impl Into<String>,
        state: Option<Box<dyn State>>,
    ) -> Result<(), FsmError> {
        let name = name.into();
        if name.is_empty() {
            return Err(FsmError::EmptyName);
        }
        let state = state.ok_or(FsmError::NilState)?;
        self.states.insert(name, state);
        Ok(())
    }

    /// Unregister `name`. The current state name is not cleared.
    pub fn remove_state(&mut self, name: &str) {
        self.states.remove(name);
    }

    /// State registered under `name`.
    pub fn state(&self, name: &str) -> Option<&dyn State> {
        self.states.get(name).map(|state| &**state)
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Register a gating action under `name`, replacing any previous entry.
    pub fn add_action<A>(&mut self, name: impl Into<String>, action: A) -> Result<(), FsmError>
    where
        A: Action + 'static,
    {
        self.add_action_opt(name, Some(Box::new(action)))
    }

    /// Register an action that may be absent. `None` is rejected with
    /// [`FsmError::NilAction`].
    pub fn add_action_opt(
        &mut self,
        name: impl Into<String>,
        action: Option<Box<dyn Action>>,
    ) -> Result<(), FsmError> {
        let name = name.into();
        if name.is_empty() {
            return Err(FsmError::EmptyName);
        }
        let action = action.ok_or(FsmError::NilAction)?;
        self.actions.insert(name, action);
        Ok(())
    }

    pub fn remove_action(&mut self, name: &str) {
        self.actions.remove(name);
    }

    /// Gating action registered under `name`.
    pub fn action(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(|action| &**action)
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Append a transition. `action` may be empty for an ungated transition.
    ///
    /// State names are not checked here; a transition to an unregistered
    /// state fails when it is triggered.
    pub fn add_transition(
        &mut self,
        from: impl Into<String>,
        event: impl Into<String>,
        to: impl Into<String>,
        action: impl Into<String>,
    ) -> Result<(), FsmError> {
        self.add_transition_record(Some(Transition::new(from, event, to, action)))
    }

    pub fn add_transition_record(&mut self, transition: Option<Transition>) -> Result<(), FsmError> {
        let transition = transition.ok_or(FsmError::NilTransition)?;
        transition.validate()?;
        self.transitions.push(transition);
        Ok(())
    }

    /// Remove the first transition keyed by `(from, event)`.
    pub fn remove_transition(&mut self, from: &str, event: &str) {
        if let Some(index) = self.transitions.iter().position(|t| t.matches(from, event)) {
            self.transitions.remove(index);
        }
    }

    /// First transition keyed by `(from, event)`.
    pub fn transition(&self, from: &str, event: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.matches(from, event))
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Enter `first` and make it current.
    ///
    /// Its `on_enter` receives the empty string. An unregistered name is
    /// rejected and leaves the current state untouched.
    pub fn start(&mut self, first: &str) -> Result<(), FsmError> {
        if first.is_empty() {
            return Err(FsmError::NoFirstState);
        }
        let state = self
            .states
            .get_mut(first)
            .ok_or_else(|| FsmError::ToStateNotFound(first.to_string()))?;

        self.current = Some(first.to_string());
        state.on_enter("");
        debug!(target: "agentmind::fsm", machine = self.id, state = first, "Machine started");
        Ok(())
    }

    /// Exit the current state with an empty target. The current state name
    /// is kept.
    pub fn stop(&mut self) {
        let Some(current) = self.current.as_deref() else {
            return;
        };
        if let Some(state) = self.states.get_mut(current) {
            state.on_exit("");
            debug!(target: "agentmind::fsm", machine = self.id, state = current, "Machine stopped");
        }
    }

    /// Tick the current state. No-op if it is not registered.
    pub fn update(&mut self, dt: i64) {
        let Some(current) = self.current.as_deref() else {
            return;
        };
        if let Some(state) = self.states.get_mut(current) {
            state.on_update(dt);
        }
    }

    /// Fire `event` from the current state.
    ///
    /// If the matching transition names a registered action, the action is
    /// consulted first; a `false` answer returns `Ok(Triggered::Vetoed)` and
    /// leaves the machine exactly as it was.
    pub fn trigger(&mut self, event: &str, params: &[Param]) -> Result<Triggered, FsmError> {
        if event.is_empty() {
            return Err(FsmError::EmptyEvent);
        }
        let from = self.current.clone().ok_or(FsmError::NoFirstState)?;
        let transition = self
            .transition(&from, event)
            .cloned()
            .ok_or_else(|| FsmError::TransitionNotFound {
                from: from.clone(),
                event: event.to_string(),
            })?;

        if !self.states.contains_key(&from) {
            return Err(FsmError::FromStateNotFound(from));
        }
        if !self.states.contains_key(&transition.to) {
            return Err(FsmError::ToStateNotFound(transition.to));
        }

        if let Some(gate) = self.actions.get_mut(&transition.action) {
            if !gate.do_action(event, params) {
                debug!(
                    target: "agentmind::fsm",
                    machine = self.id,
                    from = %from,
                    to = %transition.to,
                    event,
                    action = %transition.action,
                    "Transition vetoed"
                );
                return Ok(Triggered::Vetoed);
            }
        }

        self.switch(&from, &transition.to);
        self.history.push(from.as_str());
        debug!(
            target: "agentmind::fsm",
            machine = self.id,
            from = %from,
            to = %transition.to,
            event,
            "Transitioned"
        );
        self.current = Some(transition.to);
        Ok(Triggered::Transitioned)
    }

    /// Return to the most recently exited state.
    ///
    /// The new state's `on_enter` receives the state being left. Nothing is
    /// pushed, so popping twice walks two steps back.
    pub fn pop_state(&mut self) -> Result<(), FsmError> {
        let target = self
            .history
            .peek()
            .map(str::to_string)
            .ok_or(FsmError::NoHistory)?;
        let current = self.current.clone().unwrap_or_default();

        if !self.states.contains_key(&current) {
            return Err(FsmError::FromStateNotFound(current));
        }
        if !self.states.contains_key(&target) {
            return Err(FsmError::ToStateNotFound(target));
        }

        self.switch(&current, &target);
        self.history.pop();
        debug!(
            target: "agentmind::fsm",
            machine = self.id,
            from = %current,
            to = %target,
            "Popped state"
        );
        self.current = Some(target);
        Ok(())
    }

    fn switch(&mut self, from: &str, to: &str) {
        if let Some(old) = self.states.get_mut(from) {
            old.on_exit(to);
        }
        if let Some(new) = self.states.get_mut(to) {
            new.on_enter(from);
        }
    }
}

impl fmt::Debug for Fsm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<&str> = self.states.keys().map(String::as_str).collect();
        states.sort_unstable();
        let mut actions: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        actions.sort_unstable();

        f.debug_struct("Fsm")
            .field("id", &self.id)
            .field("current", &self.current)
            .field("history", &self.history.path())
            .field("states", &states)
            .field("actions", &actions)
            .field("transitions", &self.transitions)
            .finish()
    }
}

//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{Action, State};
use crate::fsm::{Fsm, Transition};

/// Builder for constructing state machines with a fluent API.
///
/// Registration errors surface from `build()` rather than from each call.
pub struct FsmBuilder {
    id: u32,
    initial: Option<String>,
    states: Vec<(String, Box<dyn State>)>,
    actions: Vec<(String, Box<dyn Action>)>,
    transitions: Vec<Transition>,
}

impl FsmBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            id: 0,
            initial: None,
            states: Vec::new(),
            actions: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Set the owning agent's id (defaults to 0).
    pub fn id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Set the state entered by `start()`.
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    pub fn state<S>(mut self, name: impl Into<String>, state: S) -> Self
    where
        S: State + 'static,
    {
        let state: Box<dyn State> = Box::new(state);
        self.states.push((name.into(), state));
        self
    }

    pub fn action<A>(mut self, name: impl Into<String>, action: A) -> Self
    where
        A: Action + 'static,
    {
        let action: Box<dyn Action> = Box::new(action);
        self.actions.push((name.into(), action));
        self
    }

    /// Add an ungated transition.
    pub fn transition(
        self,
        from: impl Into<String>,
        event: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.gated_transition(from, event, to, "")
    }

    /// Add a transition gated by the action registered as `action`.
    pub fn gated_transition(
        mut self,
        from: impl Into<String>,
        event: impl Into<String>,
        to: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        self.transitions
            .push(Transition::new(from, event, to, action));
        self
    }

    /// Build the machine without starting it.
    ///
    /// Returns an error if any registration is invalid or the initial state,
    /// when given, is not among the registered states.
    pub fn build(self) -> Result<Fsm, BuildError> {
        self.assemble().map(|(fsm, _)| fsm)
    }

    /// Build the machine and enter the initial state.
    pub fn start(self) -> Result<Fsm, BuildError> {
        let (mut fsm, initial) = self.assemble()?;
        let initial = initial.ok_or(BuildError::MissingInitialState)?;
        fsm.start(&initial)?;
        Ok(fsm)
    }

    fn assemble(self) -> Result<(Fsm, Option<String>), BuildError> {
        let mut fsm = Fsm::new(self.id);
        for (name, state) in self.states {
            fsm.add_state_opt(name, Some(state))?;
        }
        for (name, action) in self.actions {
            fsm.add_action_opt(name, Some(action))?;
        }
        for transition in self.transitions {
            fsm.add_transition_record(Some(transition))?;
        }

        if let Some(initial) = &self.initial {
            if !fsm.has_state(initial) {
                return Err(BuildError::UnknownInitialState(initial.clone()));
            }
        }
        Ok((fsm, self.initial))
    }
}

impl Default for FsmBuilder {
    fn default() -> Self {
        Self::new()
    }
}

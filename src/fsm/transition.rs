//! Transition records.

use crate::fsm::error::FsmError;
use serde::{Deserialize, Serialize};

/// Rule mapping `(from, event)` to a destination state.
///
/// `action` names an optional gate; an empty string means the transition
/// is never vetoed.
///
/// # Example
///
/// ```rust
/// use agentmind::fsm::Transition;
///
/// let flee = Transition::new("Patrol", "hurt", "Flee", "");
/// assert!(flee.matches("Patrol", "hurt"));
/// assert!(!flee.is_gated());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// State the transition leaves
    pub from: String,
    /// Event that fires it
    pub event: String,
    /// State the transition enters
    pub to: String,
    /// Name of the gating action, empty for none
    pub action: String,
}

impl Transition {
    pub fn new(
        from: impl Into<String>,
        event: impl Into<String>,
        to: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            event: event.into(),
            to: to.into(),
            action: action.into(),
        }
    }

    /// Check that every key field is present.
    pub fn validate(&self) -> Result<(), FsmError> {
        if self.from.is_empty() {
            return Err(FsmError::EmptyFrom);
        }
        if self.event.is_empty() {
            return Err(FsmError::EmptyEvent);
        }
        if self.to.is_empty() {
            return Err(FsmError::EmptyTo);
        }
        Ok(())
    }

    pub fn matches(&self, from: &str, event: &str) -> bool {
        self.from == from && self.event == event
    }

    pub fn is_gated(&self) -> bool {
        !self.action.is_empty()
    }
}

//! Transition gates.
//!
//! An action is consulted when a transition that names it is triggered.
//! Returning `false` vetoes the transition.

use super::param::Param;

/// Gate invoked before a transition executes.
///
/// Any `FnMut(&str, &[Param]) -> bool` closure is an action.
///
/// # Example
///
/// ```rust
/// use agentmind::core::{Action, Param};
///
/// let mut only_loud = |_event: &str, params: &[Param]| {
///     params.first().and_then(Param::as_int).unwrap_or(0) > 10
/// };
///
/// assert!(only_loud.do_action("noise", &[Param::from(50)]));
/// assert!(!only_loud.do_action("noise", &[Param::from(2)]));
/// assert!(!only_loud.do_action("noise", &[]));
/// ```
pub trait Action {
    /// Decide whether the transition fired by `event` may proceed.
    fn do_action(&mut self, event: &str, params: &[Param]) -> bool;
}

impl<F> Action for F
where
    F: FnMut(&str, &[Param]) -> bool,
{
    fn do_action(&mut self, event: &str, params: &[Param]) -> bool {
        self(event, params)
    }
}

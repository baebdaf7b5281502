//! Errors returned by state machine operations.

use thiserror::Error;

/// Errors that can occur when configuring or driving a state machine.
///
/// Every variant is caller-correctable misuse. A vetoed transition is not
/// an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FsmError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("State is missing")]
    NilState,

    #[error("Action is missing")]
    NilAction,

    #[error("Transition is missing")]
    NilTransition,

    #[error("No transition from '{from}' on event '{event}'")]
    TransitionNotFound { from: String, event: String },

    #[error("Event must not be empty")]
    EmptyEvent,

    #[error("Transition source state must not be empty")]
    EmptyFrom,

    #[error("Transition target state must not be empty")]
    EmptyTo,

    #[error("No current state. Call .start(state) first")]
    NoFirstState,

    #[error("No previous state to return to")]
    NoHistory,

    #[error("Source state '{0}' is not registered")]
    FromStateNotFound(String),

    #[error("Target state '{0}' is not registered")]
    ToStateNotFound(String),
}

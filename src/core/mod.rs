//! Core capability types shared by the state machine and behavior trees.
//!
//! This module contains:
//! - The `State` and `Action` capability traits
//! - `Param`, the value type passed through gates and leaf handlers
//! - `StateHistory`, the machine's "go back one" stack

mod action;
mod history;
mod param;
mod state;

pub use action::Action;
pub use history::{HistoryEntry, StateHistory};
pub use param::Param;
pub use state::{NoopState, State};

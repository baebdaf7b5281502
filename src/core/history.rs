//! History of previously active states.
//!
//! The machine pushes the state it leaves on every successful trigger and
//! pops on `pop_state`. It is a "go back one" stack, not an undo log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A state the machine left, and when it left it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Name of the state that was exited
    pub state: String,
    /// When the state was exited
    pub left_at: DateTime<Utc>,
}

/// LIFO stack of previously active state names.
///
/// # Example
///
/// ```rust
/// use agentmind::core::StateHistory;
///
/// let mut history = StateHistory::new();
/// history.push("Idle");
/// history.push("Patrol");
///
/// assert_eq!(history.peek(), Some("Patrol"));
/// assert_eq!(history.path(), vec!["Idle", "Patrol"]);
///
/// assert_eq!(history.pop().map(|e| e.state), Some("Patrol".to_string()));
/// assert_eq!(history.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    entries: Vec<HistoryEntry>,
}

impl StateHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record that `state` was just exited.
    pub fn push(&mut self, state: impl Into<String>) {
        self.entries.push(HistoryEntry {
            state: state.into(),
            left_at: Utc::now(),
        });
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    /// Name of the most recent entry, if any.
    pub fn peek(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.state.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// State names from oldest to newest.
    pub fn path(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.state.as_str()).collect()
    }

    /// All entries from oldest to newest.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

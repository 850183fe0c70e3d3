use serde::{Deserialize, Serialize};

/// Per-session line transition counters. Reset when a reading session
/// starts, never decremented while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingCounters {
    /// Transitions between two different blocks.
    pub line_changes: u64,
    /// Transitions to a lower block id (regressions).
    pub line_back: u64,
    /// Transitions jumping more than one block ahead.
    pub line_skip: u64,
}

impl ReadingCounters {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

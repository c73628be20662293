//! Explicit retry accounting for one sub-job.

use serde::{Deserialize, Serialize};

/// Bounded generation-round budget, scoped to a single sub-job.
///
/// `max_attempts` bounds the TOTAL number of generation rounds, the first
/// included. An exhausted budget converts missing items from a retryable
/// condition into a reported partial failure; it never aborts sibling
/// sub-jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryBudget {
    pub attempts_made: usize,
    pub max_attempts: usize,
}

impl RetryBudget {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            attempts_made: 0,
            max_attempts,
        }
    }

    pub fn exhausted(&self) -> bool {
        self.attempts_made >= self.max_attempts
    }

    pub fn record_attempt(&mut self) {
        self.attempts_made += 1;
    }

    pub fn remaining(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts_made)
    }
}

/// Terminal state of one sub-job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubJobState {
    /// Every expected item was produced.
    Complete,
    /// The budget ran out with items still missing; accepted fragments are
    /// preserved.
    PartialFailure,
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How often a failed deposit or withdrawal is attempted, and how long to
/// wait in between.
///
/// The default is a single attempt. The delay only separates attempts: once
/// the final attempt fails the error is returned straight away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// The total number of attempts. Zero is treated as one.
    pub attempts: u32,

    /// The pause between two attempts, in seconds. Never applied after the
    /// final attempt.
    pub delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 1,
            delay_secs: 10,
        }
    }
}

impl RetryPolicy {
    /// The total number of attempts, at least one
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    /// The pause between two attempts
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

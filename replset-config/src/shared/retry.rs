use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry policy configuration for operations such as configuration submission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts before giving up.
    pub max_attempts: u32,
    /// Initial delay, in milliseconds, before the first retry.
    pub initial_delay_ms: u64,
    /// Maximum delay between retries.
    pub max_delay_ms: u64,
    /// Exponential backoff multiplier applied to the delay after each attempt.
    pub backoff_factor: f32,
}

impl RetryConfig {
    /// Returns the delay to wait after the given 1-based failed attempt.
    ///
    /// The delay grows by [`RetryConfig::backoff_factor`] per attempt and is
    /// capped at [`RetryConfig::max_delay_ms`].
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_factor.max(1.0) as f64;
        let delay = self.initial_delay_ms as f64 * factor.powi(attempt.saturating_sub(1) as i32);
        Duration::from_millis((delay as u64).min(self.max_delay_ms))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 500,
            max_delay_ms: 10_000,
            backoff_factor: 2.0,
        }
    }
}

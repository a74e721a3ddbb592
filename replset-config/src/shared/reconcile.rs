use serde::{Deserialize, Serialize};

use crate::shared::{RetryConfig, ValidationError};

/// Configuration for the reconciliation loop cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconcileConfig {
    /// Seconds to sleep between reconciliation passes.
    #[serde(default = "default_sleep_secs")]
    pub sleep_secs: u64,
    /// Seconds the cached replica-set status stays fresh before the next pass
    /// fetches it again. Independent of the loop cadence.
    #[serde(default = "default_status_freshness_secs")]
    pub status_freshness_secs: u64,
}

fn default_sleep_secs() -> u64 {
    5
}

fn default_status_freshness_secs() -> u64 {
    60
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            sleep_secs: default_sleep_secs(),
            status_freshness_secs: default_status_freshness_secs(),
        }
    }
}

impl ReconcileConfig {
    /// Validates the [`ReconcileConfig`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sleep_secs == 0 {
            return Err(ValidationError::InvalidConfig(
                "`reconcile.sleep_secs` must not be 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration for applying replica-set reconfigurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconfigConfig {
    /// Retry policy for configuration submission.
    #[serde(default = "default_reconfig_retry")]
    pub retry: RetryConfig,
    /// Milliseconds to wait after adding the incoming primary during hand-off,
    /// letting the new member catch up before the old primary is removed.
    #[serde(default = "default_handoff_catch_up_ms")]
    pub handoff_catch_up_ms: u64,
    /// Milliseconds to wait after removing the outgoing primary during
    /// hand-off, letting the election settle before remaining changes apply.
    #[serde(default = "default_handoff_settle_ms")]
    pub handoff_settle_ms: u64,
}

fn default_reconfig_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 20,
        initial_delay_ms: 500,
        max_delay_ms: 500,
        backoff_factor: 1.0,
    }
}

fn default_handoff_catch_up_ms() -> u64 {
    5_000
}

fn default_handoff_settle_ms() -> u64 {
    20_000
}

impl Default for ReconfigConfig {
    fn default() -> Self {
        Self {
            retry: default_reconfig_retry(),
            handoff_catch_up_ms: default_handoff_catch_up_ms(),
            handoff_settle_ms: default_handoff_settle_ms(),
        }
    }
}

impl ReconfigConfig {
    /// Validates the [`ReconfigConfig`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.retry.max_attempts == 0 {
            return Err(ValidationError::InvalidConfig(
                "`reconfig.retry.max_attempts` must not be 0".to_string(),
            ));
        }

        Ok(())
    }
}

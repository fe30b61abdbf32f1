//! Pacing and rate-limit backoff for the audit loop.
//!
//! Two fixed waits: a cooldown before every step after the first, and a
//! longer cooldown before re-sending a request the provider rejected with a
//! rate limit. Neither consumes step budget.

use std::time::Duration;

use crate::config::AuditConfig;

/// Cooldowns applied by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Wait before step `n` for every `n > 0`.
    pub step_cooldown: Duration,
    /// Wait before retrying a rate-limited request.
    pub rate_limit_cooldown: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from(&AuditConfig::default())
    }
}

impl From<&AuditConfig> for BackoffPolicy {
    fn from(config: &AuditConfig) -> Self {
        Self {
            step_cooldown: Duration::from_secs(config.step_cooldown_secs),
            rate_limit_cooldown: Duration::from_secs(config.rate_limit_cooldown_secs),
        }
    }
}

impl BackoffPolicy {
    /// No waiting at all.
    pub fn none() -> Self {
        Self {
            step_cooldown: Duration::ZERO,
            rate_limit_cooldown: Duration::ZERO,
        }
    }
}

/// Rate limit bookkeeping for a single run.
#[derive(Debug, Default)]
pub struct RateLimitState {
    /// Rate limit hits since the last successful call.
    pub consecutive_hits: u32,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rate limit response and return how long to wait.
    ///
    /// The wait is always the policy's fixed cooldown; the provider's
    /// retry-after hint is only logged.
    pub fn record_rate_limit(&mut self, policy: &BackoffPolicy, retry_after: Option<Duration>) -> Duration {
        self.consecutive_hits += 1;

        let delay = policy.rate_limit_cooldown;
        tracing::warn!(
            backoff_secs = delay.as_secs(),
            retry_after_secs = retry_after.map(|d| d.as_secs()),
            consecutive_hits = self.consecutive_hits,
            "Rate limited, backing off before retrying the same step"
        );
        delay
    }

    /// Record a successful API call.
    pub fn record_success(&mut self) {
        self.consecutive_hits = 0;
    }
}

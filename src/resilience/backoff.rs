//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

use crate::config::ConfirmationConfig;

/// Bounded retry schedule used while waiting on an external system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after the first failed attempt.
    pub base: Duration,
    /// Ceiling for any single delay (before jitter).
    pub max_delay: Duration,
    /// Total attempts allowed, including the first.
    pub max_attempts: u32,
    /// Wall-clock budget for all attempts together.
    pub deadline: Duration,
}

impl RetryPolicy {
    /// Delay to wait after `attempt` failed attempts.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        calculate_backoff(
            attempt,
            self.base.as_millis() as u64,
            self.max_delay.as_millis() as u64,
        )
    }
}

impl From<&ConfirmationConfig> for RetryPolicy {
    fn from(config: &ConfirmationConfig) -> Self {
        Self {
            base: Duration::from_millis(config.initial_interval_ms),
            max_delay: Duration::from_millis(config.max_interval_ms),
            max_attempts: config.max_attempts,
            deadline: config.deadline(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&ConfirmationConfig::default())
    }
}

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let b1 = calculate_backoff(1, 5000, 60_000);
        assert!(b1.as_millis() >= 5000 && b1.as_millis() < 5500);

        let b2 = calculate_backoff(2, 5000, 60_000);
        assert!(b2.as_millis() >= 10_000);

        let max = calculate_backoff(10, 5000, 60_000);
        assert!(max.as_millis() >= 60_000 && max.as_millis() < 66_000);
    }

    #[test]
    fn test_zero_attempt_has_no_delay() {
        assert_eq!(calculate_backoff(0, 5000, 60_000), Duration::ZERO);
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.base, Duration::from_secs(5));
        assert_eq!(policy.max_delay, Duration::from_secs(60));
        assert_eq!(policy.max_attempts, 30);
        assert!(policy.delay_after(1) >= Duration::from_secs(5));
    }
}

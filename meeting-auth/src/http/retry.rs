//! Backoff policy for the transient retry middleware.

use std::time::{Duration, SystemTime};

use reqwest_retry::{RetryDecision, RetryPolicy};

const MAX_DELAY: Duration = Duration::from_secs(60);

/// Doubling backoff with a retry count and an optional wall-clock budget.
///
/// The delay before retry `n` is `base_delay * 2^n`, capped at 60s. When a budget is
/// set, no retry is scheduled that would start after `request_start + budget`.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    max_retries: u32,
    base_delay: Duration,
    budget: Option<Duration>,
}

impl BackoffPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
            budget: None,
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Stop retrying once this much time has passed since the first attempt.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    fn delay_for(&self, n_past_retries: u32) -> Duration {
        2u32.checked_pow(n_past_retries)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(MAX_DELAY, |delay| delay.min(MAX_DELAY))
    }
}

impl RetryPolicy for BackoffPolicy {
    fn should_retry(&self, request_start_time: SystemTime, n_past_retries: u32) -> RetryDecision {
        if n_past_retries >= self.max_retries {
            return RetryDecision::DoNotRetry;
        }

        let execute_after = SystemTime::now() + self.delay_for(n_past_retries);
        if let Some(budget) = self.budget {
            if execute_after > request_start_time + budget {
                return RetryDecision::DoNotRetry;
            }
        }

        RetryDecision::Retry { execute_after }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_from_base() {
        let policy = BackoffPolicy::new(3).with_base_delay(Duration::from_millis(250));

        let delays: Vec<Duration> = (0..3).map(|n| policy.delay_for(n)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_secs(1)
            ]
        );
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = BackoffPolicy::new(40);
        assert_eq!(policy.delay_for(10), MAX_DELAY);
        assert_eq!(policy.delay_for(39), MAX_DELAY);
    }

    #[test]
    fn test_retry_count_is_bounded() {
        let policy = BackoffPolicy::new(2);

        assert!(matches!(
            policy.should_retry(SystemTime::now(), 1),
            RetryDecision::Retry { .. }
        ));
        assert!(matches!(
            policy.should_retry(SystemTime::now(), 2),
            RetryDecision::DoNotRetry
        ));
        assert!(matches!(
            BackoffPolicy::new(0).should_retry(SystemTime::now(), 0),
            RetryDecision::DoNotRetry
        ));
    }

    #[test]
    fn test_spent_budget_stops_retries() {
        let policy = BackoffPolicy::new(5).with_budget(Duration::from_secs(10));
        let started = SystemTime::now() - Duration::from_secs(30);

        assert!(matches!(
            policy.should_retry(started, 0),
            RetryDecision::DoNotRetry
        ));
        assert!(matches!(
            policy.should_retry(SystemTime::now(), 0),
            RetryDecision::Retry { .. }
        ));
    }
}

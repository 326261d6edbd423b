//! Bounded retry with exponential backoff around provider calls.
//!
//! Provider calls cross a network; transient faults are expected and
//! retried here. Unresolvable outcomes are definitive and never retried.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::drive::ProviderError;

/// Retry tuning applied to every provider call site.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt budget, including the first call. Values below 1 are
    /// treated as 1.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the retry following failed attempt `attempt`
    /// (0-based): doubles each time, capped at `max_backoff`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Run `call` until it succeeds, fails unretryably, or the attempt
    /// budget is spent. The last error is returned as-is.
    pub async fn run<T, F, Fut>(&self, op: &'static str, mut call: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let budget = self.max_attempts.max(1);
        let mut attempt = 0u32;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt.saturating_add(1) < budget => {
                    let delay = self.delay(attempt);
                    warn!(
                        operation = op,
                        attempt = attempt.saturating_add(1),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "provider call failed, retrying: {err}"
                    );
                    tokio::time::sleep(delay).await;
                    attempt = attempt.saturating_add(1);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_transient_faults_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let policy = instant_policy(3);
        let result = policy
            .run("op", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(ProviderError::failure("flaky"))
                } else {
                    Ok(42)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_budget_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let policy = instant_policy(3);
        let result: Result<(), _> = policy
            .run("op", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::failure("still down"))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unresolvable_is_never_retried() {
        let calls = AtomicU32::new(0);
        let policy = instant_policy(5);
        let result: Result<(), _> = policy
            .run("op", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::unresolvable("gone"))
            })
            .await;
        assert!(matches!(result, Err(ProviderError::Unresolvable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(350),
        };
        assert_eq!(policy.delay(0), Duration::from_millis(100));
        assert_eq!(policy.delay(1), Duration::from_millis(200));
        assert_eq!(policy.delay(2), Duration::from_millis(350));
        assert_eq!(policy.delay(10), Duration::from_millis(350));
    }
}

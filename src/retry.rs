use std::future::Future;
use std::time::Duration;

use crate::api::ApiFailure;
use crate::error::{Error, Result};

/// Bounded exponential backoff for transient API failures.
///
/// Fatal failures are returned on the first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Same budget, no waiting. Useful against local stubs.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails fatally, or the budget is spent
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, ApiFailure>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(ApiFailure::Fatal(message)) => return Err(Error::FatalApi(message)),
                Err(ApiFailure::Transient(message)) => {
                    if attempt >= self.max_attempts() {
                        return Err(Error::TransientFetch {
                            attempts: attempt,
                            message,
                        });
                    }
                    let delay = self.delay_for(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_delays_double_and_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3), Duration::from_secs(2));
        assert_eq!(policy.delay_for(10), Duration::from_secs(8));
        assert_eq!(policy.max_attempts(), 4);
    }

    #[tokio::test]
    async fn test_recovers_within_budget() {
        let calls = Cell::new(0);
        let result = RetryPolicy::immediate(3)
            .run(|| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n <= 3 {
                        Err(ApiFailure::Transient("429".to_string()))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 4);
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test]
    async fn test_exhausted_budget_is_transient_error() {
        let calls = Cell::new(0);
        let result: Result<()> = RetryPolicy::immediate(3)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err(ApiFailure::Transient("connection reset".to_string())) }
            })
            .await;
        match result {
            Err(Error::TransientFetch { attempts, message }) => {
                assert_eq!(attempts, 4);
                assert_eq!(message, "connection reset");
            }
            other => panic!("expected TransientFetch, got {:?}", other),
        }
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test]
    async fn test_fatal_is_not_retried() {
        let calls = Cell::new(0);
        let result: Result<()> = RetryPolicy::immediate(3)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err(ApiFailure::Fatal("quotaExceeded".to_string())) }
            })
            .await;
        assert!(matches!(result, Err(Error::FatalApi(_))));
        assert_eq!(calls.get(), 1);
    }
}

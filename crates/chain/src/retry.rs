use crate::error::ChainClientError;
use core::{future::Future, time::Duration};
use tracing::warn;

/// Timeout and retry schedule applied to every chain request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts made before giving up, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt. Doubles on every further attempt.
    pub initial_backoff: Duration,
    /// Upper bound of the delay between attempts.
    pub max_backoff: Duration,
    /// Deadline of a single attempt.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A single attempt bounded by `timeout`.
    pub fn no_retry(timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            timeout,
            ..Self::default()
        }
    }

    /// Delay after the failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Runs `request` under `policy`.
///
/// Each attempt is bounded by [`RetryPolicy::timeout`]; an elapsed deadline
/// counts as a transient failure. Transient failures are retried with
/// exponential backoff until [`RetryPolicy::max_attempts`] is reached, after
/// which [`ChainClientError::RetriesExhausted`] is returned. Permanent failures
/// are returned immediately.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    method: &'static str,
    mut request: F,
) -> Result<T, ChainClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ChainClientError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let err = match tokio::time::timeout(policy.timeout, request()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => err,
            Err(_) => ChainClientError::Timeout(policy.timeout),
        };

        if !err.is_transient() {
            return Err(err);
        }
        if attempt >= max_attempts {
            return Err(ChainClientError::RetriesExhausted {
                method,
                attempts: attempt,
                last: Box::new(err),
            });
        }

        let delay = policy.backoff(attempt);
        warn!(method, attempt, ?delay, %err, "transient rpc failure, retrying");
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(250));
        assert_eq!(policy.backoff(2), Duration::from_millis(500));
        assert_eq!(policy.backoff(3), Duration::from_secs(1));
        assert_eq!(policy.backoff(10), Duration::from_secs(5));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryPolicy::default(), "eth_chainId", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(ChainClientError::Unavailable("connection reset".into()))
            } else {
                Ok(10u64)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 10);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let result: Result<u64, _> = with_retry(&policy, "eth_gasPrice", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ChainClientError::Unavailable("rate limited".into()))
        })
        .await;
        assert!(matches!(
            result,
            Err(ChainClientError::RetriesExhausted {
                method: "eth_gasPrice",
                attempts: 3,
                ..
            })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_is_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let result: Result<u64, _> = with_retry(&policy, "eth_getStorageAt", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ChainClientError::Rejected("invalid address".into()))
        })
        .await;
        assert!(matches!(result, Err(ChainClientError::Rejected(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_request_times_out() {
        let policy = RetryPolicy::no_retry(Duration::from_millis(100));
        let result: Result<u64, _> = with_retry(&policy, "eth_chainId", || async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(1)
        })
        .await;
        match result {
            Err(ChainClientError::RetriesExhausted { attempts, last, .. }) => {
                assert_eq!(attempts, 1);
                assert!(matches!(*last, ChainClientError::Timeout(_)));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

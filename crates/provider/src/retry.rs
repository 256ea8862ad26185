//! Linear-backoff retry for provider requests.

use std::future::Future;
use std::time::Duration;

use crate::job::ProviderError;

/// Default attempt count for one adapter call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay; attempt N waits `base * N` before retrying.
pub const DEFAULT_RETRY_BASE: Duration = Duration::from_millis(500);

/// Delay before retry number `attempt` (1-based): `base * attempt`.
pub fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base * attempt
}

/// Run `request` up to `max_attempts` times, sleeping `base * attempt`
/// between attempts.
///
/// Only errors where [`ProviderError::is_retryable`] holds are retried;
/// auth failures and timeouts propagate immediately. The last error is
/// returned once attempts are exhausted.
pub async fn with_retry<T, F, Fut>(
    mut request: F,
    base: Duration,
    max_attempts: u32,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match request().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = retry_delay(base, attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Provider request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn delay_grows_linearly() {
        let base = Duration::from_millis(500);
        assert_eq!(retry_delay(base, 1), Duration::from_millis(500));
        assert_eq!(retry_delay(base, 2), Duration::from_millis(1000));
        assert_eq!(retry_delay(base, 3), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn succeeds_without_retry() {
        let calls = AtomicU32::new(0);
        let result = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, ProviderError>(42) }
            },
            Duration::ZERO,
            3,
        )
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_failures_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = with_retry(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ProviderError::Request("reset".into()))
                    } else {
                        Ok("ok")
                    }
                }
            },
            Duration::ZERO,
            5,
        )
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn auth_failure_is_never_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderError::Auth { status: 403 }) }
            },
            Duration::ZERO,
            5,
        )
        .await;
        assert_matches!(result, Err(ProviderError::Auth { status: 403 }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausting_attempts_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderError::Request("down".into())) }
            },
            Duration::ZERO,
            3,
        )
        .await;
        assert_matches!(result, Err(ProviderError::Request(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}

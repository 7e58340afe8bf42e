//! Caller-side retry with exponential back-off and jitter.
//!
//! The Graph clients never retry internally; orchestration code decides how
//! hard to try. [`retry_with_backoff`] retries only transient request
//! failures. A locally exhausted quota ([`PlatformError::RateLimited`]) is a
//! hard stop until the window resets, and a malformed payload will not
//! improve on a second read.

use std::future::Future;
use std::time::Duration;

use crate::error::PlatformError;

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// **Retriable:** transport failures and timeouts (`status == None`), HTTP
/// 5xx, and HTTP 429 from the remote API.
///
/// **Not retriable:** [`PlatformError::RateLimited`], other 4xx statuses,
/// [`PlatformError::MalformedResponse`], [`PlatformError::InvalidBaseUrl`].
#[must_use]
pub fn is_retriable(err: &PlatformError) -> bool {
    match err {
        PlatformError::RequestFailed { status, .. } => match status {
            None => true,
            Some(code) => *code == 429 || (500..600).contains(code),
        },
        PlatformError::RateLimited { .. }
        | PlatformError::MalformedResponse { .. }
        | PlatformError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// retriable errors.
///
/// Back-off schedule with `backoff_base_ms = 500`:
///
/// | Retry | Sleep before it            |
/// |-------|----------------------------|
/// | 1     | 500 ms × 2⁰ ± 25 % jitter  |
/// | 2     | 500 ms × 2¹ ± 25 % jitter  |
/// | 3     | 500 ms × 2² ± 25 % jitter  |
///
/// Delay is capped at 60 s. Non-retriable errors are returned immediately.
///
/// # Errors
///
/// Returns the last error from `operation` once it is non-retriable or the
/// retry budget is spent.
pub async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlatformError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlatformError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient platform error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use atlasiq_core::Platform;

    use super::*;

    fn request_failed(status: Option<u16>) -> PlatformError {
        PlatformError::RequestFailed {
            platform: Platform::Facebook,
            status,
            reason: "boom".to_owned(),
        }
    }

    #[test]
    fn timeouts_and_server_errors_are_retriable() {
        assert!(is_retriable(&request_failed(None)));
        assert!(is_retriable(&request_failed(Some(503))));
        assert!(is_retriable(&request_failed(Some(429))));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&request_failed(Some(400))));
        assert!(!is_retriable(&request_failed(Some(403))));
    }

    #[test]
    fn local_quota_and_malformed_are_not_retriable() {
        assert!(!is_retriable(&PlatformError::RateLimited {
            platform: Platform::Instagram,
            max_calls: 200,
        }));
        assert!(!is_retriable(&PlatformError::MalformedResponse {
            platform: Platform::Instagram,
            context: "media".to_owned(),
            reason: "missing data".to_owned(),
        }));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, PlatformError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_failure_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(request_failed(None))
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(request_failed(Some(502)))
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(PlatformError::RequestFailed {
                status: Some(502),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_rate_limited() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(PlatformError::RateLimited {
                    platform: Platform::Facebook,
                    max_calls: 200,
                })
            }
        })
        .await;
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "RateLimited must not be retried"
        );
        assert!(matches!(result, Err(PlatformError::RateLimited { .. })));
    }
}

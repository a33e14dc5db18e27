//! Retry with exponential back-off and jitter for XRPC calls.
//!
//! Reads are retried on timeouts, connection failures, 5xx and 429. Writes
//! are retried only when the server cannot have stored the record: the
//! connection never opened, or the request was rate-limited.

use std::future::Future;
use std::time::Duration;

use crate::error::BlueskyError;

/// Which failures a call may be re-sent after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryClass {
    Read,
    Write,
}

pub(crate) fn is_retriable(err: &BlueskyError, class: RetryClass) -> bool {
    match (err, class) {
        (BlueskyError::Http(e), RetryClass::Read) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        (BlueskyError::Http(e), RetryClass::Write) => e.is_connect(),
        (BlueskyError::Xrpc { status, .. }, RetryClass::Read) => {
            *status == 429 || (500..600).contains(status)
        }
        (BlueskyError::Xrpc { status, .. }, RetryClass::Write) => *status == 429,
        (BlueskyError::Deserialize { .. }, _) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on errors
/// [`is_retriable`] accepts for `class`. Delay is
/// `backoff_base_ms × 2^(attempt-1)` ± 25 % jitter, capped at 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    class: RetryClass,
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, BlueskyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BlueskyError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err, class) || attempt >= max_retries {
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
                    ?class,
                    error = %err,
                    "Bluesky transient error; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

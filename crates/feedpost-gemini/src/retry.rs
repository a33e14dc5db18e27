//! Retry with exponential back-off and jitter for the Gemini client.
//!
//! Only transport failures and 5xx answers (the model being overloaded) are
//! retried. Quota exhaustion (429) and content problems are returned at once;
//! the next scheduled run is the retry for those.

use std::future::Future;
use std::time::Duration;

use crate::error::GeminiError;

pub(crate) fn is_retriable(err: &GeminiError) -> bool {
    match err {
        GeminiError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        GeminiError::Api { status, .. } => (500..600).contains(status),
        GeminiError::Blocked(_) | GeminiError::EmptyResponse | GeminiError::Deserialize { .. } => {
            false
        }
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors. Delay is `backoff_base_ms × 2^(attempt-1)` ± 25 % jitter, capped at
/// 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, GeminiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GeminiError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
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
                    "Gemini transient error; retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

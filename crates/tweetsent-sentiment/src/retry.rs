//! Back-off for transient lexicon service failures.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::SentimentError;

const MAX_BACKOFF_MS: u64 = 60_000;

/// Timeouts, connection failures and 5xx are transient; the public service
/// answers 503 when it throttles. Everything else fails immediately.
pub(crate) fn is_retriable(err: &SentimentError) -> bool {
    match err {
        SentimentError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        SentimentError::LexiconStatus { status } => (500..600).contains(status),
        SentimentError::LexiconResponse(_) | SentimentError::InvalidUrl { .. } => false,
    }
}

/// Delay before the `retry`-th retry (1-based): `base_ms * 2^(retry-1)`, capped
/// at one minute, then scaled by a random factor in `[0.75, 1.25)`.
fn backoff_delay(base_ms: u64, retry: u32) -> Duration {
    let shift = retry.saturating_sub(1).min(10);
    let exponential = base_ms.saturating_mul(1 << shift).min(MAX_BACKOFF_MS);
    let factor: f64 = rand::rng().random_range(0.75..1.25);
    #[allow(clippy::cast_precision_loss)]
    let millis = exponential as f64 * factor;
    Duration::from_secs_f64(millis / 1_000.0)
}

/// Calls `operation` once, then again after a back-off for each transient
/// failure, at most `max_retries` extra times. The last error is returned as
/// is; callers never receive a made-up score.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SentimentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SentimentError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retry == max_retries || !is_retriable(&err) {
            return Err(err);
        }

        retry += 1;
        let delay = backoff_delay(backoff_base_ms, retry);
        tracing::warn!(
            retry,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "retrying lexicon call"
        );
        tokio::time::sleep(delay).await;
    }
}

//! Retry with exponential backoff for page loads.
//!
//! Only transient conditions are retried: network failures, rate limiting and
//! server errors, and bot-challenge interstitials. Everything else is returned
//! on the first failure.

use std::future::Future;
use std::time::Duration;

use crate::error::PageError;

fn is_retriable(err: &PageError) -> bool {
    match err {
        PageError::Http(_) | PageError::BotChallenge { .. } => true,
        PageError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// Runs `operation` up to `max_retries + 1` times, sleeping
/// `backoff_base_ms * 2^attempt` milliseconds between attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PageError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_ms = backoff_base_ms.saturating_mul(1u64 << attempt.min(32));
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            error = %err,
            "transient page load error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        attempt += 1;
    }
}

//! Retry controller for page fetches.
//!
//! [`fetch_with_retry`] wraps a single [`PageFetcher`] call and retries on
//! transient errors (timeouts, connection failures, HTTP 429 and 5xx).
//! Permanent errors (other 4xx) are returned immediately without consuming
//! any retry budget. A malformed body gets exactly one re-fetch, outside the
//! transient budget, before it is treated as permanent.
//!
//! Waits between attempts come from the session's [`DelayPolicy`] with an
//! escalating attempt index, so the window doubles on every retry.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::delay::{wait_cancellable, DelayPolicy};
use crate::error::{ScraperError, TransportError};
use crate::fetcher::PageFetcher;
use crate::types::{PageRequest, RawPage};

/// Fetches one page, retrying transient failures up to `max_retries` times.
///
/// With `max_retries = N` and a fetcher that always fails transiently, the
/// fetcher is called exactly `N + 1` times. With `max_retries = 0` it is
/// called once and nothing waits.
///
/// Cancellation is checked before every attempt and every wait, and also
/// aborts an in-flight request.
///
/// # Errors
///
/// - [`ScraperError::PermanentFailure`] carrying the last [`TransportError`]
///   once the error is permanent or the retry budget is exhausted.
/// - [`ScraperError::Cancelled`] if `cancel` fires.
pub async fn fetch_with_retry<F, D>(
    fetcher: &F,
    delay: &mut D,
    request: &PageRequest,
    max_retries: u32,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<RawPage, ScraperError>
where
    F: PageFetcher + ?Sized,
    D: DelayPolicy + ?Sized,
{
    let mut attempts = 0u32;
    let mut transient_failures = 0u32;
    let mut refetched_malformed = false;

    loop {
        if cancel.is_cancelled() {
            return Err(ScraperError::Cancelled);
        }

        attempts += 1;
        let result = tokio::select! {
            () = cancel.cancelled() => return Err(ScraperError::Cancelled),
            result = fetcher.fetch(request, timeout) => result,
        };
        let err = match result {
            Ok(page) => return Ok(page),
            Err(err) => err,
        };

        let retry_index = if err.is_transient() {
            if transient_failures >= max_retries {
                return Err(ScraperError::PermanentFailure {
                    attempts,
                    last: err,
                });
            }
            transient_failures += 1;
            transient_failures
        } else if is_malformed(&err) && !refetched_malformed && max_retries > 0 {
            refetched_malformed = true;
            1
        } else {
            return Err(ScraperError::PermanentFailure {
                attempts,
                last: err,
            });
        };

        let wait = delay.next_delay(retry_index);
        tracing::warn!(
            attempt = attempts,
            max_retries,
            delay_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "page fetch failed, retrying after backoff"
        );
        wait_cancellable(wait, cancel).await?;
    }
}

fn is_malformed(err: &TransportError) -> bool {
    matches!(err, TransportError::MalformedResponse { .. })
}

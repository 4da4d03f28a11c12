//! HTTP retry with exponential backoff.
//!
//! Transport errors, rate limiting (429), and server errors (5xx) are
//! retried; any other non-success status fails on the first response.
//! Every failure surfaces as [`LoadError::DataUnavailable`].

use std::time::Duration;

use reqwest::StatusCode;

use crate::LoadError;

/// Retries after the first attempt. Backoff is 2s, 4s, 8s.
const MAX_RETRIES: u32 = 3;

/// Result of a single request attempt that did not succeed.
enum Failure {
    /// Worth another attempt.
    Transient(LoadError),
    /// Final regardless of remaining attempts.
    Permanent(LoadError),
}

/// Sends the request built by `build_request` and returns the body text.
///
/// `build_request` is called once per attempt, since a
/// [`reqwest::RequestBuilder`] is consumed by `send()`.
///
/// # Errors
///
/// Returns [`LoadError::DataUnavailable`] on a non-retryable status, or
/// once the retries are exhausted.
#[allow(clippy::future_not_send)]
pub async fn send_text<F>(location: &str, build_request: F) -> Result<String, LoadError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;
    loop {
        match attempt_once(location, build_request()).await {
            Ok(body) => return Ok(body),
            Err(Failure::Transient(e)) if attempt < MAX_RETRIES => {
                attempt += 1;
                let delay = backoff(attempt);
                log::warn!("{e}; retry {attempt}/{MAX_RETRIES} in {delay:?}");
                tokio::time::sleep(delay).await;
            }
            Err(Failure::Transient(e) | Failure::Permanent(e)) => return Err(e),
        }
    }
}

async fn attempt_once(
    location: &str,
    request: reqwest::RequestBuilder,
) -> Result<String, Failure> {
    let response = request.send().await.map_err(|e| {
        let err = unavailable(location, e.to_string());
        if is_transient(&e) {
            Failure::Transient(err)
        } else {
            Failure::Permanent(err)
        }
    })?;

    let status = response.status();
    if let Err(err) = check_status(location, status) {
        return Err(if is_retryable(status) {
            Failure::Transient(err)
        } else {
            Failure::Permanent(err)
        });
    }

    response
        .text()
        .await
        .map_err(|e| Failure::Transient(unavailable(location, format!("body read failed: {e}"))))
}

/// Delay before retry number `attempt` (1-based).
const fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt)
}

/// Returns `true` for statuses that may succeed on a later attempt.
#[must_use]
pub fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Maps a non-success status to [`LoadError::DataUnavailable`].
///
/// # Errors
///
/// Returns [`LoadError::DataUnavailable`] unless `status` is 2xx.
pub fn check_status(location: &str, status: StatusCode) -> Result<(), LoadError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(unavailable(location, format!("HTTP {status}")))
    }
}

fn unavailable(location: &str, message: String) -> LoadError {
    LoadError::DataUnavailable {
        location: location.to_string(),
        message,
    }
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}

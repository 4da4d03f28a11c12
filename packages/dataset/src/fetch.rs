//! Layer location dispatch.
//!
//! `http://` and `https://` locations are fetched with `reqwest` through
//! the retry helpers; anything else is read from the local filesystem.

use crate::{LoadError, retry};

/// Returns `true` if `location` should be fetched over HTTP.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Reads the raw body of a layer.
///
/// # Errors
///
/// Returns [`LoadError::DataUnavailable`] if the request or file read
/// fails.
pub async fn fetch_text(client: &reqwest::Client, location: &str) -> Result<String, LoadError> {
    if is_remote(location) {
        log::debug!("Fetching {location}");
        return retry::send_text(location, || client.get(location)).await;
    }

    log::debug!("Reading {location}");
    tokio::fs::read_to_string(location)
        .await
        .map_err(|e| LoadError::DataUnavailable {
            location: location.to_string(),
            message: e.to_string(),
        })
}

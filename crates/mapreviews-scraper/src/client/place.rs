//! Place identifier extraction from Google Maps URLs.

use std::sync::LazyLock;

use mapreviews_core::ConfigError;
use regex::Regex;

const ALLOWED_HOSTS: [&str; 2] = ["maps.google.com", "www.google.com"];

/// `!1s0x...:0x...` data segment of a place URL.
static DATA_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"1s(0x[0-9a-f]+:0x[0-9a-f]+)").expect("valid place data-segment regex")
});

/// Any `0x...:0x...` feature id anywhere in the URL.
static FEATURE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"0x[0-9a-f]+:0x[0-9a-f]+").expect("valid feature id regex"));

/// Resolves the backend feature id (e.g. `0x89c259af:0x1a2b3c`) from a
/// place URL.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPlaceUrl`] if the URL does not parse, is not
/// on a Google Maps host, or carries no feature id.
pub fn extract_place_id(place_url: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidPlaceUrl {
        url: place_url.to_owned(),
        reason,
    };

    let url = reqwest::Url::parse(place_url).map_err(|e| invalid(e.to_string()))?;
    let host = url.host_str().unwrap_or_default();
    if !ALLOWED_HOSTS.contains(&host) {
        return Err(invalid(format!(
            "host \"{host}\" is not a Google Maps host"
        )));
    }

    if let Some(caps) = DATA_SEGMENT_RE.captures(place_url) {
        return Ok(caps[1].to_owned());
    }
    FEATURE_ID_RE
        .find(place_url)
        .map(|m| m.as_str().to_owned())
        .ok_or_else(|| invalid("no place identifier (0x...:0x...) found".to_owned()))
}

//! HTTP client for the Google Maps `listugcposts` reviews RPC.

mod place;

use std::time::Duration;

use async_trait::async_trait;
use mapreviews_core::SourceFilter;
use reqwest::{Client, Url};

use crate::error::{ScraperError, TransportError};
use crate::fetcher::PageFetcher;
use crate::parse::parse_page;
use crate::types::{PageRequest, RawPage};

pub use place::extract_place_id;

const DEFAULT_BASE_URL: &str = "https://www.google.com";
const REVIEWS_PATH: &str = "/maps/rpc/listugcposts";

/// Reviews requested per page.
const PAGE_SIZE: u32 = 10;

/// Tail shared by both `pb` request descriptors: session token, sort order
/// and the response field mask.
const PB_SUFFIX: &str =
    "!5m2!1sxkx7aMKiOLKshbIPoZm1sAk!7e81!8m9!2b1!3b1!5b1!7b1!12m4!1b1!2b1!4m1!1e1!11m0!13m1!1e1";

/// Server-side restriction to TripAdvisor-syndicated reviews.
const PB_ALTERNATE_SOURCE: &str = "!13i100532569";

/// HTTP client for one place's reviews.
///
/// Sends browser-like headers and the configured `User-Agent`. Timeouts are
/// applied per request by the caller. Non-2xx statuses, timeouts and
/// malformed bodies are all reported as typed [`TransportError`]s; nothing is
/// retried here.
pub struct ReviewsClient {
    client: Client,
    place_id: String,
    endpoint: Url,
}

impl ReviewsClient {
    /// Creates a client for the place referenced by `place_url`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Config`] if `place_url` is not a Google Maps place URL.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed (e.g., invalid TLS config).
    pub fn new(place_url: &str, user_agent: &str) -> Result<Self, ScraperError> {
        let place_id = extract_place_id(place_url)?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let endpoint = Self::endpoint(DEFAULT_BASE_URL)?;
        tracing::debug!(place_id, "resolved place identifier");
        Ok(Self {
            client,
            place_id,
            endpoint,
        })
    }

    /// Sends requests to `base_url` (scheme, host and port) instead of the
    /// public backend. Used to point the client at a local mock server.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ScraperError> {
        self.endpoint = Self::endpoint(base_url)?;
        Ok(self)
    }

    /// Backend feature id of the place, e.g. `0x89c259af:0x3f2f4a5b`.
    #[must_use]
    pub fn place_id(&self) -> &str {
        &self.place_id
    }

    fn endpoint(base_url: &str) -> Result<Url, ScraperError> {
        let base = format!("{}{REVIEWS_PATH}", base_url.trim_end_matches('/'));
        Url::parse(&base).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Builds the `pb` request descriptor for a page.
    fn pb_param(place_id: &str, request: &PageRequest) -> String {
        let token = request.cursor.as_token();
        match request.source_filter {
            SourceFilter::None => format!(
                "!1m6!1s{place_id}!6m4!4m1!1e1!4m1!1e3!2m2!1i{PAGE_SIZE}!2s{token}{PB_SUFFIX}"
            ),
            SourceFilter::AlternateSource => format!(
                "!1m7!1s{place_id}!6m4!4m1!1e1!4m1!1e3{PB_ALTERNATE_SOURCE}!2m2!1i{PAGE_SIZE}!2s{token}{PB_SUFFIX}"
            ),
        }
    }

    /// Builds the full RPC URL for a page request.
    fn reviews_url(&self, request: &PageRequest) -> String {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("authuser", "0")
            .append_pair("hl", "en")
            .append_pair("gl", "us")
            .append_pair("pb", &Self::pb_param(&self.place_id, request));
        url.to_string()
    }
}

#[async_trait]
impl PageFetcher for ReviewsClient {
    async fn fetch(
        &self,
        request: &PageRequest,
        timeout: Duration,
    ) -> Result<RawPage, TransportError> {
        let url = self.reviews_url(request);

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .header(
                reqwest::header::ACCEPT,
                "application/json,text/html;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .header(reqwest::header::REFERER, "https://www.google.com/maps")
            .header("DNT", "1")
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(&url, e))?;

        parse_page(&body).map_err(|source| TransportError::MalformedResponse { url, source })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

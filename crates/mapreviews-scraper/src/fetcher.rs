use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::{PageRequest, RawPage};

/// Transport seam between the pagination engine and the network.
///
/// An implementation performs exactly one request per call, enforces
/// `timeout`, and classifies every failure into a [`TransportError`]. It never
/// retries; that is [`crate::retry::fetch_with_retry`]'s job.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(
        &self,
        request: &PageRequest,
        timeout: Duration,
    ) -> Result<RawPage, TransportError>;
}

//! Pagination driver: walks the review cursor for one place.
//!
//! The driver is an explicit state machine:
//!
//! ```text
//! Start ─▶ FetchingPage ─▶ Accumulating ─┬─▶ FetchingPage (fresh cursor)
//!               │                         └─▶ Done (no cursor, repeated cursor, page limit)
//!               └─▶ Failed (permanent failure, cancellation)
//! ```
//!
//! Requests are strictly sequential: the next cursor is unknown until the
//! current page is parsed. The accumulated records and the set of seen
//! cursors are owned by the driver for the duration of one session.
//!
//! **Partial results on failure**: `Failed` keeps every record accumulated
//! before the failing page and returns it alongside the error. Callers
//! decide whether a partial set is acceptable.

use std::collections::HashSet;

use mapreviews_core::{ReviewRecord, ScrapeSession, SourceFilter};
use tokio_util::sync::CancellationToken;

use crate::client::ReviewsClient;
use crate::delay::{wait_cancellable, DelayPolicy, JitteredDelay};
use crate::error::ScraperError;
use crate::fetcher::PageFetcher;
use crate::normalize::{matches_source_filter, normalize_entry};
use crate::retry::fetch_with_retry;
use crate::types::{PageRequest, RawPage};

/// Terminal state of a scrape session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeState {
    Done,
    Failed,
}

/// Result of [`scrape`]: every record collected, plus the error that stopped
/// the session early, if any.
#[derive(Debug)]
pub struct ScrapeOutcome {
    /// Records in page encounter order.
    pub records: Vec<ReviewRecord>,
    /// Pages successfully fetched and accumulated.
    pub pages: usize,
    /// Set when the session ended in [`ScrapeState::Failed`].
    pub error: Option<ScraperError>,
}

impl ScrapeOutcome {
    fn failed_before_start(error: ScraperError) -> Self {
        Self {
            records: Vec::new(),
            pages: 0,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn state(&self) -> ScrapeState {
        if self.error.is_some() {
            ScrapeState::Failed
        } else {
            ScrapeState::Done
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state() == ScrapeState::Done
    }
}

enum DriverState {
    Start,
    FetchingPage(PageRequest),
    Accumulating { request: PageRequest, page: RawPage },
    Done,
    Failed(ScraperError),
}

struct PaginationDriver<'a, F: ?Sized, D: ?Sized> {
    session: &'a ScrapeSession,
    fetcher: &'a F,
    delay: &'a mut D,
    cancel: &'a CancellationToken,
    records: Vec<ReviewRecord>,
    seen_cursors: HashSet<String>,
    pages: usize,
}

impl<F, D> PaginationDriver<'_, F, D>
where
    F: PageFetcher + ?Sized,
    D: DelayPolicy + ?Sized,
{
    async fn run(mut self) -> ScrapeOutcome {
        let mut state = DriverState::Start;
        loop {
            state = match state {
                DriverState::Start => self.start(),
                DriverState::FetchingPage(request) => self.fetch_page(request).await,
                DriverState::Accumulating { request, page } => self.accumulate(&request, page),
                DriverState::Done => return self.finish(None),
                DriverState::Failed(err) => return self.finish(Some(err)),
            };
        }
    }

    fn start(&self) -> DriverState {
        tracing::info!(
            target_url = self.session.target(),
            source_filter = %self.session.source_filter(),
            max_retries = self.session.max_retries(),
            max_pages = ?self.session.max_pages(),
            "starting review scrape"
        );
        DriverState::FetchingPage(PageRequest::first(self.session.source_filter()))
    }

    async fn fetch_page(&mut self, request: PageRequest) -> DriverState {
        if self.cancel.is_cancelled() {
            return DriverState::Failed(ScraperError::Cancelled);
        }

        let wait = self.delay.next_delay(0);
        if let Err(err) = wait_cancellable(wait, self.cancel).await {
            return DriverState::Failed(err);
        }

        match fetch_with_retry(
            self.fetcher,
            &mut *self.delay,
            &request,
            self.session.max_retries(),
            self.session.timeout(),
            self.cancel,
        )
        .await
        {
            Ok(page) => DriverState::Accumulating { request, page },
            Err(err) => DriverState::Failed(err),
        }
    }

    fn accumulate(&mut self, request: &PageRequest, page: RawPage) -> DriverState {
        self.pages += 1;
        let source_filter = self.session.source_filter();
        let before = self.records.len();

        for entry in &page.entries {
            if !matches_source_filter(entry, source_filter) {
                tracing::debug!(
                    source = entry.source.as_deref().unwrap_or_default(),
                    "skipping review from unexpected source"
                );
                continue;
            }
            self.records.push(normalize_entry(entry, source_filter));
        }

        tracing::info!(
            page = self.pages,
            collected = self.records.len() - before,
            total = self.records.len(),
            "page collected"
        );

        let Some(next) = page.next_cursor else {
            tracing::info!(pages = self.pages, "no more pages available");
            return DriverState::Done;
        };

        if self.seen_cursors.contains(&next) {
            tracing::warn!(
                pages = self.pages,
                cursor = %next,
                "backend repeated a cursor, stopping"
            );
            return DriverState::Done;
        }

        if self
            .session
            .max_pages()
            .is_some_and(|max_pages| self.pages >= max_pages)
        {
            tracing::info!(pages = self.pages, "reached maximum page limit");
            return DriverState::Done;
        }

        self.seen_cursors.insert(next.clone());
        DriverState::FetchingPage(request.next(next))
    }

    fn finish(self, error: Option<ScraperError>) -> ScrapeOutcome {
        if error.is_none()
            && self.records.is_empty()
            && self.session.source_filter() == SourceFilter::AlternateSource
        {
            tracing::warn!(
                target_url = self.session.target(),
                "no TripAdvisor reviews found, the place may not have TripAdvisor integration"
            );
        }
        match &error {
            None => tracing::info!(
                pages = self.pages,
                total = self.records.len(),
                "scrape completed"
            ),
            Some(err) => tracing::error!(
                pages = self.pages,
                total = self.records.len(),
                error = %err,
                "scrape stopped early, returning partial results"
            ),
        }
        ScrapeOutcome {
            records: self.records,
            pages: self.pages,
            error,
        }
    }
}

/// Runs one scrape session against `fetcher`, walking the cursor until the
/// backend stops returning one.
///
/// Never panics and never discards records: the outcome always carries what
/// was collected, with `error` set if the session ended in `Failed`.
pub async fn scrape<F, D>(
    session: &ScrapeSession,
    fetcher: &F,
    delay: &mut D,
    cancel: &CancellationToken,
) -> ScrapeOutcome
where
    F: PageFetcher + ?Sized,
    D: DelayPolicy + ?Sized,
{
    PaginationDriver {
        session,
        fetcher,
        delay,
        cancel,
        records: Vec::new(),
        seen_cursors: HashSet::new(),
        pages: 0,
    }
    .run()
    .await
}

/// Scrapes the place named by `session` from the live backend, with jittered
/// delays drawn from the session's bounds.
///
/// The place URL is validated before any request is sent; a bad URL yields
/// an outcome with no records and a [`ScraperError::Config`] error.
pub async fn scrape_reviews(
    session: &ScrapeSession,
    user_agent: &str,
    cancel: &CancellationToken,
) -> ScrapeOutcome {
    let client = match ReviewsClient::new(session.target(), user_agent) {
        Ok(client) => client,
        Err(err) => return ScrapeOutcome::failed_before_start(err),
    };
    let mut delay = JitteredDelay::new(session.delay_bounds());
    scrape(session, &client, &mut delay, cancel).await
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;

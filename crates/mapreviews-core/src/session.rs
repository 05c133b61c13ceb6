//! Scrape session configuration.
//!
//! A [`ScrapeSession`] is built once through [`ScrapeSessionBuilder::build`],
//! which performs every validation up front. After that it is read-only: the
//! pagination driver borrows it for the lifetime of the scrape.

use std::time::Duration;

use crate::ConfigError;

/// Server-side restriction on which review source the backend returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFilter {
    /// All reviews, primarily first-party ones.
    #[default]
    None,
    /// Only reviews syndicated from the secondary aggregator (TripAdvisor).
    AlternateSource,
}

impl SourceFilter {
    /// Source label to assign to entries the backend left unlabeled.
    #[must_use]
    pub fn default_source_name(self) -> &'static str {
        match self {
            SourceFilter::None => crate::PRIMARY_SOURCE_NAME,
            SourceFilter::AlternateSource => crate::ALTERNATE_SOURCE_NAME,
        }
    }
}

impl std::fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFilter::None => write!(f, "none"),
            SourceFilter::AlternateSource => write!(f, "alternate-source"),
        }
    }
}

/// Inclusive range the randomized inter-request delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayBounds {
    min: Duration,
    max: Duration,
}

impl DelayBounds {
    /// No waiting at all. Used by tests and by sessions configured with `0 0`.
    pub const ZERO: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDelayBounds`] if either bound is negative,
    /// non-finite, too large for a [`Duration`], or `min > max`.
    pub fn from_secs(min_secs: f64, max_secs: f64) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidDelayBounds { min_secs, max_secs };
        let min = Duration::try_from_secs_f64(min_secs).map_err(|_| invalid())?;
        let max = Duration::try_from_secs_f64(max_secs).map_err(|_| invalid())?;
        if min > max {
            return Err(invalid());
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        self.max
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.max.is_zero()
    }
}

/// Immutable configuration for one scrape of one location.
#[derive(Debug, Clone)]
pub struct ScrapeSession {
    target: String,
    source_filter: SourceFilter,
    delay_bounds: DelayBounds,
    timeout: Duration,
    max_retries: u32,
    max_pages: Option<usize>,
}

impl ScrapeSession {
    /// Starts configuring a session for the given place URL.
    #[must_use]
    pub fn builder(target: impl Into<String>) -> ScrapeSessionBuilder {
        ScrapeSessionBuilder::new(target.into())
    }

    /// Place URL the session scrapes.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn source_filter(&self) -> SourceFilter {
        self.source_filter
    }

    #[must_use]
    pub fn delay_bounds(&self) -> DelayBounds {
        self.delay_bounds
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of additional attempts allowed after a transient failure.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Upper bound on fetched pages, if any.
    #[must_use]
    pub fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }
}

/// Collects raw, unvalidated session parameters.
#[derive(Debug, Clone)]
pub struct ScrapeSessionBuilder {
    target: String,
    source_filter: SourceFilter,
    delay_secs: (f64, f64),
    timeout_secs: f64,
    max_retries: u32,
    max_pages: Option<usize>,
}

impl ScrapeSessionBuilder {
    fn new(target: String) -> Self {
        Self {
            target,
            source_filter: SourceFilter::None,
            delay_secs: (1.0, 3.0),
            timeout_secs: 10.0,
            max_retries: 3,
            max_pages: None,
        }
    }

    #[must_use]
    pub fn source_filter(mut self, source_filter: SourceFilter) -> Self {
        self.source_filter = source_filter;
        self
    }

    #[must_use]
    pub fn delay_secs(mut self, min: f64, max: f64) -> Self {
        self.delay_secs = (min, max);
        self
    }

    #[must_use]
    pub fn timeout_secs(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Validates every parameter and freezes the session.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidPlaceUrl`] if the target is blank.
    /// - [`ConfigError::InvalidDelayBounds`] unless `0 <= min <= max`.
    /// - [`ConfigError::InvalidTimeout`] unless the timeout is a positive, finite number.
    /// - [`ConfigError::InvalidMaxPages`] if `max_pages` is `Some(0)`.
    pub fn build(self) -> Result<ScrapeSession, ConfigError> {
        let target = self.target.trim().to_owned();
        if target.is_empty() {
            return Err(ConfigError::InvalidPlaceUrl {
                url: self.target,
                reason: "place URL is empty".to_owned(),
            });
        }

        let (min, max) = self.delay_secs;
        let delay_bounds = DelayBounds::from_secs(min, max)?;

        let timeout = Duration::try_from_secs_f64(self.timeout_secs)
            .ok()
            .filter(|t| !t.is_zero())
            .ok_or(ConfigError::InvalidTimeout(self.timeout_secs))?;

        if self.max_pages == Some(0) {
            return Err(ConfigError::InvalidMaxPages);
        }

        Ok(ScrapeSession {
            target,
            source_filter: self.source_filter,
            delay_bounds,
            timeout,
            max_retries: self.max_retries,
            max_pages: self.max_pages,
        })
    }
}

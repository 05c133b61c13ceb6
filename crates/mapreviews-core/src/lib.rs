pub mod app_config;
pub mod config;
pub mod reviews;
pub mod session;

use thiserror::Error;

pub use app_config::Settings;
pub use config::{load_settings, load_settings_from_env};
pub use reviews::{ReviewRecord, ALTERNATE_SOURCE_NAME, PRIMARY_SOURCE_NAME};
pub use session::{DelayBounds, ScrapeSession, SourceFilter};

/// Errors raised while loading settings or validating a scrape session.
///
/// All of these are detected before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid delay bounds: min {min_secs}s, max {max_secs}s (need 0 <= min <= max)")]
    InvalidDelayBounds { min_secs: f64, max_secs: f64 },

    #[error("request timeout must be greater than zero, got {0}s")]
    InvalidTimeout(f64),

    #[error("max pages must be at least 1 when set")]
    InvalidMaxPages,

    #[error("invalid place URL \"{url}\": {reason}")]
    InvalidPlaceUrl { url: String, reason: String },
}

/// Desktop browser `User-Agent` sent with every backend request unless
/// overridden. The reviews RPC rejects obviously scripted agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Environment-derived defaults for the scraper.
///
/// CLI flags take precedence over these values; see `mapreviews-cli`.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub delay_min_secs: f64,
    pub delay_max_secs: f64,
    pub request_timeout_secs: f64,
    pub max_retries: u32,
    pub user_agent: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay_min_secs: 1.0,
            delay_max_secs: 3.0,
            request_timeout_secs: 10.0,
            max_retries: 3,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

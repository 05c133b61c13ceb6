use crate::app_config::{Settings, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load scraper settings from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but cannot be parsed.
pub fn load_settings() -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();
    load_settings_from_env()
}

/// Load scraper settings from environment variables already in the process.
///
/// Unlike [`load_settings`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but cannot be parsed.
pub fn load_settings_from_env() -> Result<Settings, ConfigError> {
    build_settings(|key| std::env::var(key))
}

/// Build settings using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_settings<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let delay_min_secs = parse_f64("MAPREVIEWS_DELAY_MIN_SECS", "1")?;
    let delay_max_secs = parse_f64("MAPREVIEWS_DELAY_MAX_SECS", "3")?;
    let request_timeout_secs = parse_f64("MAPREVIEWS_REQUEST_TIMEOUT_SECS", "10")?;
    let max_retries = parse_u32("MAPREVIEWS_MAX_RETRIES", "3")?;
    let user_agent = or_default("MAPREVIEWS_USER_AGENT", DEFAULT_USER_AGENT);
    let log_level = or_default("MAPREVIEWS_LOG_LEVEL", "info");

    if user_agent.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "MAPREVIEWS_USER_AGENT".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    Ok(Settings {
        delay_min_secs,
        delay_max_secs,
        request_timeout_secs,
        max_retries,
        user_agent,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

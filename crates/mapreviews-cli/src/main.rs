mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mapreviews_core::{ScrapeSession, Settings, SourceFilter};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mapreviews-cli")]
#[command(about = "Collect reviews for a Google Maps place into a JSON file")]
struct Cli {
    /// Google Maps place URL.
    url: String,

    /// Only collect TripAdvisor-syndicated reviews.
    #[arg(long)]
    tripadvisor: bool,

    /// Output file for the collected reviews.
    #[arg(short, long, default_value = "reviews.json")]
    output: PathBuf,

    /// Random delay range between requests, in seconds.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    delay: Option<Vec<f64>>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout: Option<f64>,

    /// Retries per page for transient failures.
    #[arg(long)]
    max_retries: Option<u32>,

    /// Stop after this many pages.
    #[arg(long)]
    max_pages: Option<usize>,
}

impl Cli {
    fn session(&self, settings: &Settings) -> anyhow::Result<ScrapeSession> {
        let (delay_min, delay_max) = match self.delay.as_deref() {
            Some([min, max]) => (*min, *max),
            _ => (settings.delay_min_secs, settings.delay_max_secs),
        };
        let source_filter = if self.tripadvisor {
            SourceFilter::AlternateSource
        } else {
            SourceFilter::None
        };
        let session = ScrapeSession::builder(self.url.clone())
            .source_filter(source_filter)
            .delay_secs(delay_min, delay_max)
            .timeout_secs(self.timeout.unwrap_or(settings.request_timeout_secs))
            .max_retries(self.max_retries.unwrap_or(settings.max_retries))
            .max_pages(self.max_pages)
            .build()?;
        Ok(session)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = mapreviews_core::load_settings()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let session = cli.session(&settings)?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let outcome = mapreviews_scraper::scrape_reviews(&session, &settings.user_agent, &cancel).await;

    output::write_records(&cli.output, &outcome.records)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    tracing::info!(
        records = outcome.records.len(),
        pages = outcome.pages,
        path = %cli.output.display(),
        "reviews written"
    );

    if let Some(err) = outcome.error {
        return Err(anyhow::Error::new(err).context(format!(
            "scrape incomplete, {} partial reviews saved",
            outcome.records.len()
        )));
    }
    Ok(())
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("interrupt received, stopping after current request");
            cancel.cancel();
        }
        Err(err) => tracing::error!(error = %err, "failed to listen for ctrl-c"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["mapreviews-cli"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    const URL: &str = "https://www.google.com/maps/place/x/data=!1s0x1:0x2";

    #[test]
    fn defaults_come_from_settings() {
        let cli = parse(&[URL]);
        assert_eq!(cli.output, PathBuf::from("reviews.json"));
        let session = cli.session(&Settings::default()).unwrap();
        assert_eq!(session.source_filter(), SourceFilter::None);
        assert_eq!(session.max_retries(), 3);
        assert_eq!(session.timeout(), std::time::Duration::from_secs(10));
        assert!(session.max_pages().is_none());
    }

    #[test]
    fn flags_override_settings() {
        let cli = parse(&[
            URL,
            "--tripadvisor",
            "--delay",
            "0.5",
            "1.5",
            "--timeout",
            "4",
            "--max-retries",
            "1",
            "--max-pages",
            "2",
            "-o",
            "out/r.json",
        ]);
        let session = cli.session(&Settings::default()).unwrap();
        assert_eq!(session.source_filter(), SourceFilter::AlternateSource);
        assert_eq!(
            session.delay_bounds().max(),
            std::time::Duration::from_millis(1500)
        );
        assert_eq!(session.timeout(), std::time::Duration::from_secs(4));
        assert_eq!(session.max_retries(), 1);
        assert_eq!(session.max_pages(), Some(2));
        assert_eq!(cli.output, PathBuf::from("out/r.json"));
    }

    #[test]
    fn inverted_delay_is_rejected() {
        let cli = parse(&[URL, "--delay", "3", "1"]);
        assert!(cli.session(&Settings::default()).is_err());
    }

    #[test]
    fn url_is_required() {
        assert!(Cli::try_parse_from(["mapreviews-cli"]).is_err());
    }
}

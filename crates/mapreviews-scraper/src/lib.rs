pub mod client;
pub mod delay;
pub mod error;
pub mod fetcher;
pub mod normalize;
pub mod pagination;
pub mod parse;
mod parse_helpers;
pub mod retry;
pub mod types;

pub use client::{extract_place_id, ReviewsClient};
pub use delay::{DelayPolicy, JitteredDelay, NoDelay};
pub use error::{ParseError, ScraperError, TransportError};
pub use fetcher::PageFetcher;
pub use normalize::{matches_source_filter, normalize_entry, parse_rating};
pub use pagination::{scrape, scrape_reviews, ScrapeOutcome, ScrapeState};
pub use parse::parse_page;
pub use retry::fetch_with_retry;
pub use types::{Cursor, PageRequest, RawEntry, RawPage, RawRating};

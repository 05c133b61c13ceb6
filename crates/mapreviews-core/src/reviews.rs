use serde::{Deserialize, Serialize};

/// Source label applied to reviews that carry no label of their own during an
/// unfiltered session.
pub const PRIMARY_SOURCE_NAME: &str = "Google";

/// Source label for the secondary aggregator selected by
/// [`crate::SourceFilter::AlternateSource`].
pub const ALTERNATE_SOURCE_NAME: &str = "TripAdvisor";

/// A single review, normalized into the stable output schema.
///
/// Field order is part of the output contract: records are serialized as
/// `user`, `rating`, `published_at`, `source`, `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Display name of the reviewer. Empty when the backend omitted it.
    pub user: String,
    /// Star rating in `1..=5`, or `None` when the raw value was missing or
    /// could not be interpreted.
    pub rating: Option<u8>,
    /// Relative time exactly as the backend phrased it (e.g. `"3 weeks ago"`).
    /// Never resolved to an absolute timestamp.
    pub published_at: String,
    /// Originating review source, e.g. `"Google"` or `"TripAdvisor"`.
    pub source: String,
    /// Free-text body. Empty for rating-only reviews.
    pub content: String,
}

impl ReviewRecord {
    /// Returns `true` if the review carries any text body.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReviewRecord {
        ReviewRecord {
            user: "Ada".to_owned(),
            rating: Some(5),
            published_at: "2 months ago".to_owned(),
            source: PRIMARY_SOURCE_NAME.to_owned(),
            content: "Great coffee.".to_owned(),
        }
    }

    #[test]
    fn serializes_fields_in_contract_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"user":"Ada","rating":5,"published_at":"2 months ago","source":"Google","content":"Great coffee."}"#
        );
    }

    #[test]
    fn missing_rating_serializes_as_null() {
        let mut record = sample();
        record.rating = None;
        let value = serde_json::to_value(&record).unwrap();
        assert!(value["rating"].is_null());
    }

    #[test]
    fn has_content_ignores_whitespace() {
        let mut record = sample();
        record.content = "   ".to_owned();
        assert!(!record.has_content());
    }
}

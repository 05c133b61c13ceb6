//! Request and raw-payload types for the reviews RPC.
//!
//! ## Observed shape of a `listugcposts` page
//!
//! The body starts with the `)]}'` anti-hijacking prefix, followed by a
//! positional JSON array:
//!
//! ```text
//! [null, "<next cursor>", [<review>, <review>, ...], ...]
//! ```
//!
//! The cursor slot is `null` (or absent) on the last page. Each review is a
//! deeply nested array; the parser pulls the handful of fields we need out by
//! position and leaves the rest alone. Any of them may be missing on a given
//! review, so [`RawEntry`] models all of them as optional.

use mapreviews_core::SourceFilter;

/// Position in the backend's pagination sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// First page. Sent to the backend as an empty token.
    Start,
    /// Opaque token returned by the previous page.
    Token(String),
}

impl Cursor {
    /// The token as it is embedded in the request.
    #[must_use]
    pub fn as_token(&self) -> &str {
        match self {
            Cursor::Start => "",
            Cursor::Token(token) => token,
        }
    }
}

/// One page request. Never mutated once issued; retries reuse it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Cursor,
    pub source_filter: SourceFilter,
}

impl PageRequest {
    #[must_use]
    pub fn first(source_filter: SourceFilter) -> Self {
        Self {
            cursor: Cursor::Start,
            source_filter,
        }
    }

    /// Request for the page after this one, keeping the same filter.
    #[must_use]
    pub fn next(&self, token: String) -> Self {
        Self {
            cursor: Cursor::Token(token),
            source_filter: self.source_filter,
        }
    }
}

/// A parsed page of reviews.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPage {
    pub entries: Vec<RawEntry>,
    /// `None` on the final page.
    pub next_cursor: Option<String>,
}

/// Rating exactly as it appeared in the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRating {
    Integer(i64),
    Number(f64),
    /// Numeric string or star-count text such as `"4/5"` or `"★★★★☆"`.
    Text(String),
}

/// A single review with every field optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub author: Option<String>,
    pub rating: Option<RawRating>,
    /// Relative time string, e.g. `"a week ago"`.
    pub published: Option<String>,
    /// Source label, e.g. `"Google"` or `"Tripadvisor"`.
    pub source: Option<String>,
    pub content: Option<String>,
}

impl RawEntry {
    /// `true` if the entry carries neither an author nor a text body, in which
    /// case it cannot be attributed to anyone and is dropped by the parser.
    #[must_use]
    pub fn is_unidentifiable(&self) -> bool {
        let blank = |field: Option<&str>| field.is_none_or(|s| s.trim().is_empty());
        blank(self.author.as_deref()) && blank(self.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_cursor_is_empty_token() {
        assert_eq!(Cursor::Start.as_token(), "");
    }

    #[test]
    fn next_request_keeps_source_filter() {
        let first = PageRequest::first(SourceFilter::AlternateSource);
        let next = first.next("abc".to_owned());
        assert_eq!(next.cursor, Cursor::Token("abc".to_owned()));
        assert_eq!(next.source_filter, SourceFilter::AlternateSource);
    }

    #[test]
    fn entry_without_author_or_content_is_unidentifiable() {
        let entry = RawEntry {
            rating: Some(RawRating::Integer(5)),
            published: Some("a day ago".to_owned()),
            ..RawEntry::default()
        };
        assert!(entry.is_unidentifiable());
    }

    #[test]
    fn entry_with_only_author_is_identifiable() {
        let entry = RawEntry {
            author: Some("Grace".to_owned()),
            ..RawEntry::default()
        };
        assert!(!entry.is_unidentifiable());
    }

    #[test]
    fn whitespace_author_counts_as_missing() {
        let entry = RawEntry {
            author: Some("  ".to_owned()),
            content: Some(String::new()),
            ..RawEntry::default()
        };
        assert!(entry.is_unidentifiable());
    }
}

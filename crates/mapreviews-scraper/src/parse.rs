//! Response parser for `listugcposts` pages.
//!
//! Tolerant by construction: a review missing any individual field still
//! yields a [`RawEntry`] with that field set to `None`. Only reviews that have
//! neither an author nor a text body are dropped, since there is nothing to
//! attribute them to.

use serde_json::Value;

use crate::error::ParseError;
use crate::parse_helpers::{kind_of, str_at, value_at};
use crate::types::{RawEntry, RawPage, RawRating};

/// Anti-JSON-hijacking prefix the backend prepends to every body.
const XSSI_PREFIX: &str = ")]}'";

const CURSOR_SLOT: usize = 1;
const REVIEWS_SLOT: usize = 2;

// Field positions within a single review array.
const AUTHOR_PATH: &[isize] = &[0, 1, 4, 5, 0];
const PUBLISHED_PATH: &[isize] = &[0, 1, 6];
const SOURCE_PATH: &[isize] = &[0, 1, 13, -2];
const RATING_PATH: &[isize] = &[0, 1, 13, -1];
const CONTENT_PATH: &[isize] = &[0, 2, 15, 0, 0];

/// Parses a raw page body into its entries and next-page cursor.
///
/// - A missing, `null`, or blank cursor slot marks the final page. Any other
///   cursor is kept byte-for-byte.
/// - A missing or `null` review slot is an empty page, which is valid as
///   long as a cursor is present.
///
/// # Errors
///
/// - [`ParseError::InvalidUtf8`] / [`ParseError::InvalidJson`] for unreadable bodies.
/// - [`ParseError::UnexpectedShape`] if the top level is not an array, or the
///   cursor/review slots hold the wrong JSON types.
pub fn parse_page(body: &[u8]) -> Result<RawPage, ParseError> {
    let text = std::str::from_utf8(body)?;
    let value: Value = serde_json::from_str(strip_xssi_prefix(text))?;

    let Value::Array(slots) = value else {
        return Err(ParseError::UnexpectedShape(format!(
            "top-level value is {}, expected an array",
            kind_of(&value)
        )));
    };

    let next_cursor = match slots.get(CURSOR_SLOT) {
        None | Some(Value::Null) => None,
        Some(Value::String(token)) if token.trim().is_empty() => None,
        Some(Value::String(token)) => Some(token.clone()),
        Some(other) => {
            return Err(ParseError::UnexpectedShape(format!(
                "cursor slot is {}, expected a string",
                kind_of(other)
            )))
        }
    };

    let entries = match slots.get(REVIEWS_SLOT) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(reviews)) => reviews.iter().filter_map(parse_entry).collect(),
        Some(other) => {
            return Err(ParseError::UnexpectedShape(format!(
                "review slot is {}, expected an array",
                kind_of(other)
            )))
        }
    };

    Ok(RawPage {
        entries,
        next_cursor,
    })
}

/// Extracts one review. Returns `None` for reviews with no author and no body.
fn parse_entry(review: &Value) -> Option<RawEntry> {
    let owned = |path: &[isize]| str_at(review, path).map(str::to_owned);

    let entry = RawEntry {
        author: owned(AUTHOR_PATH),
        rating: value_at(review, RATING_PATH).and_then(raw_rating),
        published: owned(PUBLISHED_PATH),
        source: owned(SOURCE_PATH),
        content: owned(CONTENT_PATH),
    };

    if entry.is_unidentifiable() {
        tracing::debug!("dropping review with neither author nor content");
        return None;
    }
    Some(entry)
}

fn raw_rating(value: &Value) -> Option<RawRating> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(RawRating::Integer)
            .or_else(|| n.as_f64().map(RawRating::Number)),
        Value::String(s) => Some(RawRating::Text(s.clone())),
        _ => None,
    }
}

fn strip_xssi_prefix(text: &str) -> &str {
    let text = text.trim_start_matches('\u{feff}');
    match text.strip_prefix(XSSI_PREFIX) {
        Some(rest) => rest.strip_prefix(':').unwrap_or(rest),
        None => text,
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;

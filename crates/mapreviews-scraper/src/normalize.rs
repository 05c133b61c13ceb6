//! Normalization from [`RawEntry`] to [`mapreviews_core::ReviewRecord`].
//!
//! Every function here is pure: the same entry and filter always produce the
//! same record. Nothing in this module can fail; fields that cannot be
//! interpreted degrade to empty strings or a `None` rating.

use mapreviews_core::{ReviewRecord, SourceFilter};

use crate::types::{RawEntry, RawRating};

const STAR_GLYPHS: [char; 2] = ['★', '⭐'];

/// Normalizes a raw entry into the output schema.
///
/// Entries without a source label are attributed to the filter's default
/// source: `"TripAdvisor"` under [`SourceFilter::AlternateSource`], `"Google"`
/// otherwise.
#[must_use]
pub fn normalize_entry(entry: &RawEntry, source_filter: SourceFilter) -> ReviewRecord {
    let text = |field: Option<&str>| field.map(str::trim).unwrap_or_default().to_owned();

    let source = entry
        .source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(source_filter.default_source_name())
        .to_owned();

    ReviewRecord {
        user: text(entry.author.as_deref()),
        rating: entry.rating.as_ref().and_then(parse_rating),
        published_at: text(entry.published.as_deref()),
        source,
        content: text(entry.content.as_deref()),
    }
}

/// Returns `false` if the entry is explicitly labeled with a source other
/// than the one the filter selects.
///
/// The server-side filter should already exclude such entries; this is the
/// client-side check. Unlabeled entries always match.
#[must_use]
pub fn matches_source_filter(entry: &RawEntry, source_filter: SourceFilter) -> bool {
    match source_filter {
        SourceFilter::None => true,
        SourceFilter::AlternateSource => entry
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .is_none_or(|s| s.eq_ignore_ascii_case(mapreviews_core::ALTERNATE_SOURCE_NAME)),
    }
}

/// Interprets a raw rating as a whole number of stars in `1..=5`.
///
/// Accepts integers, numbers (rounded to the nearest star), numeric strings,
/// star glyph runs (`"★★★★☆"`), and fractions of a scale (`"4/5"`,
/// `"8 out of 10"`, `"Rated 4.0 out of 5"`). Anything else, or any value
/// outside `1..=5`, yields `None`.
#[must_use]
pub fn parse_rating(raw: &RawRating) -> Option<u8> {
    match raw {
        RawRating::Integer(n) => u8::try_from(*n).ok().filter(|n| (1..=5).contains(n)),
        RawRating::Number(n) => stars_from_f64(*n),
        RawRating::Text(text) => parse_rating_text(text),
    }
}

fn parse_rating_text(text: &str) -> Option<u8> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let numbers = extract_numbers(text);
    let Some(&value) = numbers.first() else {
        #[allow(clippy::cast_precision_loss)]
        let stars = text.chars().filter(|c| STAR_GLYPHS.contains(c)).count() as f64;
        return stars_from_f64(stars);
    };

    let lower = text.to_ascii_lowercase();
    let is_scaled = lower.contains('/') || lower.contains("out of");
    match numbers.get(1) {
        Some(&scale) if is_scaled && scale > 0.0 => stars_from_f64(value / scale * 5.0),
        _ => stars_from_f64(value),
    }
}

/// Decimal numbers appearing in `text`, in order.
///
/// A `-` (or U+2212) directly before a number is kept as its sign, unless it
/// follows a digit as in the range `"3-4"`.
fn extract_numbers(text: &str) -> Vec<f64> {
    let mut numbers = Vec::new();
    let mut current = String::new();
    let mut negative = false;
    let mut prev = ' ';
    for c in text.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() {
            if current.is_empty() && negative {
                current.push('-');
            }
            current.push(c);
        } else if c == '.' && !current.is_empty() && !current.contains('.') {
            current.push(c);
        } else if c == ',' && !current.is_empty() && !current.contains('.') {
            // Decimal comma, as in "4,5".
            current.push('.');
        } else if !current.is_empty() {
            if let Ok(n) = current.trim_end_matches('.').parse::<f64>() {
                numbers.push(n);
            }
            current.clear();
        }
        negative = matches!(c, '-' | '\u{2212}') && !prev.is_ascii_digit();
        prev = c;
    }
    numbers
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stars_from_f64(value: f64) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round();
    if !(1.0..=5.0).contains(&rounded) {
        return None;
    }
    Some(rounded as u8)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

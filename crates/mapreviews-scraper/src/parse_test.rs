use serde_json::{json, Value};

use super::*;

/// Builds a review array with fields at the positions the backend uses.
fn review(
    author: Option<&str>,
    published: Option<&str>,
    source: Option<&str>,
    rating: Value,
    content: Option<&str>,
) -> Value {
    let mut meta = vec![Value::Null; 14];
    if let Some(author) = author {
        meta[4] = json!([null, null, null, null, null, [author]]);
    }
    if let Some(published) = published {
        meta[6] = json!(published);
    }
    meta[13] = json!(["tag", source, rating]);

    let mut body = vec![Value::Null; 16];
    if let Some(content) = content {
        body[15] = json!([[content]]);
    }

    json!([["review-id", meta, body]])
}

fn page_body(cursor: Value, reviews: Value) -> Vec<u8> {
    let json = serde_json::to_string(&json!([null, cursor, reviews])).unwrap();
    format!(")]}}'\n{json}").into_bytes()
}

// -----------------------------------------------------------------------
// page structure
// -----------------------------------------------------------------------

#[test]
fn parses_cursor_and_entries() {
    let body = page_body(
        json!("CAESBkVnSUlDZw"),
        json!([
            review(Some("Ada"), Some("a week ago"), Some("Google"), json!(5), Some("Lovely.")),
            review(Some("Grace"), Some("2 months ago"), None, json!(3), None),
        ]),
    );
    let page = parse_page(&body).unwrap();
    assert_eq!(page.next_cursor.as_deref(), Some("CAESBkVnSUlDZw"));
    assert_eq!(page.entries.len(), 2);
    assert_eq!(page.entries[0].author.as_deref(), Some("Ada"));
    assert_eq!(page.entries[0].published.as_deref(), Some("a week ago"));
    assert_eq!(page.entries[0].source.as_deref(), Some("Google"));
    assert_eq!(page.entries[0].rating, Some(RawRating::Integer(5)));
    assert_eq!(page.entries[0].content.as_deref(), Some("Lovely."));
    assert!(page.entries[1].content.is_none());
    assert!(page.entries[1].source.is_none());
}

#[test]
fn null_cursor_marks_final_page() {
    let body = page_body(
        Value::Null,
        json!([review(Some("Ada"), None, None, json!(4), None)]),
    );
    let page = parse_page(&body).unwrap();
    assert!(page.next_cursor.is_none());
    assert_eq!(page.entries.len(), 1);
}

#[test]
fn empty_cursor_marks_final_page() {
    let body = page_body(json!(""), json!([]));
    assert!(parse_page(&body).unwrap().next_cursor.is_none());
}

#[test]
fn blank_cursor_marks_final_page() {
    let body = page_body(json!("  \n"), json!([]));
    assert!(parse_page(&body).unwrap().next_cursor.is_none());
}

#[test]
fn cursor_is_kept_verbatim() {
    let body = page_body(json!(" CAESBkVnSUlDZw== "), json!([]));
    assert_eq!(
        parse_page(&body).unwrap().next_cursor.as_deref(),
        Some(" CAESBkVnSUlDZw== ")
    );
}

#[test]
fn omitted_cursor_slot_marks_final_page() {
    let page = parse_page(b")]}'\n[null]").unwrap();
    assert!(page.next_cursor.is_none());
    assert!(page.entries.is_empty());
}

#[test]
fn empty_review_list_with_cursor_is_valid() {
    let body = page_body(json!("next"), json!([]));
    let page = parse_page(&body).unwrap();
    assert!(page.entries.is_empty());
    assert_eq!(page.next_cursor.as_deref(), Some("next"));
}

#[test]
fn null_review_list_is_empty() {
    let body = page_body(json!("next"), Value::Null);
    let page = parse_page(&body).unwrap();
    assert!(page.entries.is_empty());
}

#[test]
fn accepts_colon_prefix_variant() {
    let page = parse_page(b")]}':[null,\"abc\",[]]").unwrap();
    assert_eq!(page.next_cursor.as_deref(), Some("abc"));
}

#[test]
fn accepts_body_without_prefix() {
    let page = parse_page(b"[null,\"abc\",[]]").unwrap();
    assert_eq!(page.next_cursor.as_deref(), Some("abc"));
}

// -----------------------------------------------------------------------
// tolerance
// -----------------------------------------------------------------------

#[test]
fn drops_entries_without_author_or_content() {
    let body = page_body(
        Value::Null,
        json!([
            review(None, Some("a day ago"), None, json!(5), None),
            review(None, None, None, Value::Null, Some("Only text")),
        ]),
    );
    let page = parse_page(&body).unwrap();
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].content.as_deref(), Some("Only text"));
}

#[test]
fn garbage_entries_are_dropped_not_fatal() {
    let body = page_body(
        Value::Null,
        json!([
            42,
            "nonsense",
            [],
            review(Some("Ada"), None, None, json!(4), None),
        ]),
    );
    let page = parse_page(&body).unwrap();
    assert_eq!(page.entries.len(), 1);
}

#[test]
fn missing_rating_is_none() {
    let body = page_body(
        Value::Null,
        json!([review(Some("Ada"), None, None, Value::Null, Some("ok"))]),
    );
    let page = parse_page(&body).unwrap();
    assert!(page.entries[0].rating.is_none());
}

#[test]
fn textual_and_fractional_ratings_are_kept_raw() {
    let body = page_body(
        Value::Null,
        json!([
            review(Some("A"), None, None, json!("4/5"), None),
            review(Some("B"), None, None, json!(4.5), None),
        ]),
    );
    let page = parse_page(&body).unwrap();
    assert_eq!(page.entries[0].rating, Some(RawRating::Text("4/5".to_owned())));
    assert_eq!(page.entries[1].rating, Some(RawRating::Number(4.5)));
}

// -----------------------------------------------------------------------
// errors
// -----------------------------------------------------------------------

#[test]
fn invalid_json_is_an_error() {
    let err = parse_page(b")]}'\n<html>blocked</html>").unwrap_err();
    assert!(matches!(err, ParseError::InvalidJson(_)), "{err:?}");
}

#[test]
fn invalid_utf8_is_an_error() {
    let err = parse_page(&[0xff, 0xfe, 0x00]).unwrap_err();
    assert!(matches!(err, ParseError::InvalidUtf8(_)), "{err:?}");
}

#[test]
fn object_top_level_is_unexpected_shape() {
    let err = parse_page(b"{\"reviews\": []}").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedShape(_)), "{err:?}");
}

#[test]
fn numeric_cursor_is_unexpected_shape() {
    let err = parse_page(b"[null, 17, []]").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedShape(_)), "{err:?}");
}

#[test]
fn object_review_slot_is_unexpected_shape() {
    let err = parse_page(b"[null, \"abc\", {}]").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedShape(_)), "{err:?}");
}

//! Positional lookups into the nested-array JSON the reviews RPC returns.

use serde_json::Value;

/// Follows `path` through nested arrays, returning the value at the end.
///
/// Negative indices count from the end of the array (`-1` is the last
/// element). Returns `None` as soon as a step hits a non-array, an
/// out-of-range index, or `null`.
pub(crate) fn value_at<'a>(root: &'a Value, path: &[isize]) -> Option<&'a Value> {
    let mut current = root;
    for &index in path {
        let items = current.as_array()?;
        let resolved = if index < 0 {
            items.len().checked_sub(index.unsigned_abs())?
        } else {
            index.unsigned_abs()
        };
        current = items.get(resolved)?;
    }
    (!current.is_null()).then_some(current)
}

/// String at `path`, or `None` if missing or not a string.
pub(crate) fn str_at<'a>(root: &'a Value, path: &[isize]) -> Option<&'a str> {
    value_at(root, path).and_then(Value::as_str)
}

/// Human-readable JSON type name for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn follows_positive_indices() {
        let v = json!([[1, [2, "x"]]]);
        assert_eq!(value_at(&v, &[0, 1, 1]), Some(&json!("x")));
    }

    #[test]
    fn negative_index_counts_from_end() {
        let v = json!([["a", "b", "c"]]);
        assert_eq!(str_at(&v, &[0, -1]), Some("c"));
        assert_eq!(str_at(&v, &[0, -2]), Some("b"));
    }

    #[test]
    fn negative_index_past_start_is_none() {
        let v = json!([["a"]]);
        assert!(value_at(&v, &[0, -2]).is_none());
    }

    #[test]
    fn out_of_range_is_none() {
        let v = json!([[1]]);
        assert!(value_at(&v, &[0, 3]).is_none());
    }

    #[test]
    fn stepping_into_scalar_is_none() {
        let v = json!([5]);
        assert!(value_at(&v, &[0, 0]).is_none());
    }

    #[test]
    fn null_leaf_is_none() {
        let v = json!([null]);
        assert!(value_at(&v, &[0]).is_none());
    }

    #[test]
    fn str_at_rejects_non_strings() {
        let v = json!([42]);
        assert!(str_at(&v, &[0]).is_none());
    }
}

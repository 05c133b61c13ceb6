use std::path::Path;

use mapreviews_core::ReviewRecord;

/// Writes `records` to `path` as pretty-printed JSON, creating the parent
/// directory if it does not exist.
pub(crate) fn write_records(path: &Path, records: &[ReviewRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, rating: Option<u8>) -> ReviewRecord {
        ReviewRecord {
            user: user.to_owned(),
            rating,
            published_at: "a week ago".to_owned(),
            source: "Google".to_owned(),
            content: "Très bon café".to_owned(),
        }
    }

    #[test]
    fn writes_pretty_json_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reviews.json");

        write_records(&path, &[record("Ada", Some(5)), record("Grace", None)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Très bon café"), "non-ASCII kept verbatim");
        assert!(text.contains('\n'), "pretty printed");
        let parsed: Vec<ReviewRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].rating, None);
    }

    #[test]
    fn empty_record_set_writes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");

        write_records(&path, &[]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}

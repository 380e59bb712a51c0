//! Deal ID completion for shell scripts that call `dealflow complete`.

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Deal IDs in `timelines_dir` starting with `prefix`, sorted.
pub fn complete_deal_ids(timelines_dir: &Path, prefix: &str) -> Result<Vec<String>> {
    if !timelines_dir.exists() {
        return Ok(Vec::new());
    }

    let mut ids: Vec<String> = fs::read_dir(timelines_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("md"))
        .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
        .filter(|id| id.starts_with(prefix))
        .collect();
    ids.sort();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_complete_deal_ids_filters_by_prefix() {
        let temp = TempDir::new().unwrap();
        for name in ["acme.md", "acorn.md", "beta.md", "notes.txt"] {
            fs::write(temp.path().join(name), "").unwrap();
        }

        assert_eq!(
            complete_deal_ids(temp.path(), "ac").unwrap(),
            vec!["acme".to_string(), "acorn".to_string()]
        );
        assert_eq!(complete_deal_ids(temp.path(), "").unwrap().len(), 3);
    }

    #[test]
    fn test_complete_deal_ids_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert!(complete_deal_ids(&temp.path().join("nope"), "").unwrap().is_empty());
    }
}

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::fs::locking::{read_shared, update_exclusive, write_exclusive};
use crate::fs::work_dir::WorkDir;
use crate::models::timeline::TimelineRecord;
use crate::validation::validate_id;

use super::serialization::{parse_timeline_from_markdown, serialize_timeline_to_markdown};
use super::TimelineStore;

/// One markdown file per deal under `.work/timelines/<deal-id>.md`.
pub struct FileTimelineStore {
    dir: PathBuf,
}

impl FileTimelineStore {
    pub fn new(work_dir: &WorkDir) -> Self {
        Self {
            dir: work_dir.timelines_dir(),
        }
    }

    /// Store timelines directly in `dir`.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn timeline_path(&self, deal_id: &str) -> Result<PathBuf> {
        validate_id(deal_id)?;
        Ok(self.dir.join(format!("{deal_id}.md")))
    }

    /// Every readable timeline, sorted by deal ID. Unreadable files are
    /// logged and skipped.
    pub fn list(&self) -> Result<Vec<TimelineRecord>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read timelines directory: {}", self.dir.display()))?;

        let mut records = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("md") {
                continue;
            }
            match load_timeline_from_path(&path) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable timeline"),
            }
        }

        records.sort_by(|a, b| a.deal_id.cmp(&b.deal_id));
        Ok(records)
    }
}

impl TimelineStore for FileTimelineStore {
    fn get(&self, deal_id: &str) -> Result<Option<TimelineRecord>> {
        let path = self.timeline_path(deal_id)?;
        let Some(record) = load_timeline_from_path(&path)? else {
            return Ok(None);
        };
        ensure_owner(&path, &record, deal_id)?;
        Ok(Some(record))
    }

    fn put(&self, deal_id: &str, record: &TimelineRecord) -> Result<()> {
        let path = self.timeline_path(deal_id)?;
        if record.deal_id != deal_id {
            bail!(
                "Refusing to store the timeline of deal '{}' under '{deal_id}'",
                record.deal_id
            );
        }

        self.ensure_dir()?;
        let content = serialize_timeline_to_markdown(record)?;
        write_exclusive(&path, &content)?;
        debug!(deal_id, path = %path.display(), "timeline written");
        Ok(())
    }

    /// Check-and-create under one exclusive lock, so concurrent first
    /// commands on a new deal agree on a single timeline.
    fn get_or_create(&self, deal_id: &str, now: DateTime<Utc>) -> Result<TimelineRecord> {
        let path = self.timeline_path(deal_id)?;
        self.ensure_dir()?;

        let mut created = false;
        let content = update_exclusive(&path, |current| {
            if current.is_some() {
                return Ok(None);
            }
            created = true;
            serialize_timeline_to_markdown(&TimelineRecord::new(deal_id, now)).map(Some)
        })?
        .with_context(|| format!("Timeline file {} is empty", path.display()))?;

        let record = parse_timeline_from_markdown(&content)
            .with_context(|| format!("Failed to parse timeline from: {}", path.display()))?;
        ensure_owner(&path, &record, deal_id)?;
        if created {
            info!(deal_id, "timeline created");
        }
        Ok(record)
    }
}

impl FileTimelineStore {
    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).with_context(|| {
                format!("Failed to create timelines directory: {}", self.dir.display())
            })?;
        }
        Ok(())
    }
}

fn ensure_owner(path: &Path, record: &TimelineRecord, deal_id: &str) -> Result<()> {
    if record.deal_id != deal_id {
        bail!(
            "Timeline file {} belongs to deal '{}', not '{deal_id}'",
            path.display(),
            record.deal_id
        );
    }
    Ok(())
}

/// `None` when the file is missing or has not been written yet.
fn load_timeline_from_path(path: &Path) -> Result<Option<TimelineRecord>> {
    let Some(content) = read_shared(path)? else {
        return Ok(None);
    };

    parse_timeline_from_markdown(&content)
        .map(Some)
        .with_context(|| format!("Failed to parse timeline from: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn store() -> (TempDir, FileTimelineStore) {
        let temp = TempDir::new().unwrap();
        let store = FileTimelineStore::at(temp.path().join("timelines"));
        (temp, store)
    }

    #[test]
    fn test_get_missing_is_none() {
        let (_temp, store) = store();
        assert!(store.get("acme-001").unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let (_temp, store) = store();
        let now = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let record = TimelineRecord::new("acme-001", now);

        store.put("acme-001", &record).unwrap();
        assert!(store.dir().join("acme-001.md").is_file());
        assert_eq!(store.get("acme-001").unwrap(), Some(record));
    }

    #[test]
    fn test_rejects_unsafe_deal_ids() {
        let (_temp, store) = store();
        assert!(store.get("../escape").is_err());
        assert!(store.timeline_path("a/b").is_err());
    }

    #[test]
    fn test_put_rejects_mismatched_key() {
        let (_temp, store) = store();
        let record = TimelineRecord::new("acme-001", Utc::now());
        assert!(store.put("acme-002", &record).is_err());
    }

    #[test]
    fn test_concurrent_get_or_create_agrees_on_one_timeline() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        let (_temp, store) = store();
        let store = Arc::new(store);
        let barrier = Arc::new(Barrier::new(8));
        let base = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store
                        .get_or_create("acme-001", base + chrono::Duration::minutes(i))
                        .unwrap()
                })
            })
            .collect();

        let records: Vec<TimelineRecord> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        let stored = store.get("acme-001").unwrap().unwrap();
        assert!(records.iter().all(|record| *record == stored));
    }

    #[test]
    fn test_get_or_create_keeps_existing_timeline() {
        let (_temp, store) = store();
        let first = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let created = store.get_or_create("acme-001", first).unwrap();

        let later = store
            .get_or_create("acme-001", first + chrono::Duration::days(1))
            .unwrap();
        assert_eq!(later, created);
        assert_eq!(later.created_at, first);
    }

    #[test]
    fn test_empty_file_reads_as_missing() {
        let (_temp, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join("acme-001.md"), "").unwrap();

        assert!(store.get("acme-001").unwrap().is_none());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_skips_garbage() {
        let (_temp, store) = store();
        let now = Utc::now();
        store.put("b-deal", &TimelineRecord::new("b-deal", now)).unwrap();
        store.put("a-deal", &TimelineRecord::new("a-deal", now)).unwrap();
        fs::write(store.dir().join("broken.md"), "not a timeline").unwrap();
        fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let ids: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.deal_id)
            .collect();
        assert_eq!(ids, vec!["a-deal", "b-deal"]);
    }
}

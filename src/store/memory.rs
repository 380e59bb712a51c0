use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::models::timeline::TimelineRecord;

use super::TimelineStore;

/// In-process store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTimelineStore {
    records: Mutex<HashMap<String, TimelineRecord>>,
}

impl MemoryTimelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every operation is a single map call, so a poisoned guard still holds a
    // consistent map.
    fn records(&self) -> MutexGuard<'_, HashMap<String, TimelineRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TimelineStore for MemoryTimelineStore {
    fn get(&self, deal_id: &str) -> Result<Option<TimelineRecord>> {
        Ok(self.records().get(deal_id).cloned())
    }

    fn put(&self, deal_id: &str, record: &TimelineRecord) -> Result<()> {
        self.records().insert(deal_id.to_string(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_get_or_create_is_lazy_and_stable() {
        let store = MemoryTimelineStore::new();
        assert!(store.is_empty());

        let created = store.get_or_create("acme-001", Utc::now()).unwrap();
        assert_eq!(store.len(), 1);

        let again = store.get_or_create("acme-001", Utc::now()).unwrap();
        assert_eq!(again, created);
    }

    #[test]
    fn test_read_your_writes() {
        let store = MemoryTimelineStore::new();
        let mut record = store.get_or_create("acme-001", Utc::now()).unwrap();
        record.updated_at = Utc::now();
        store.put("acme-001", &record).unwrap();
        assert_eq!(store.get("acme-001").unwrap(), Some(record));
    }

    #[test]
    fn test_poisoned_lock_is_recovered_by_every_operation() {
        use std::sync::Arc;

        let store = Arc::new(MemoryTimelineStore::new());
        store.get_or_create("acme-001", Utc::now()).unwrap();

        let holder = Arc::clone(&store);
        let panicked = std::thread::spawn(move || {
            let _guard = holder.records.lock().unwrap();
            panic!("holder dies with the lock");
        })
        .join();
        assert!(panicked.is_err());
        assert!(store.records.is_poisoned());

        assert_eq!(store.len(), 1);
        assert!(store.get("acme-001").unwrap().is_some());
        store.get_or_create("acme-002", Utc::now()).unwrap();
        assert_eq!(store.len(), 2);
    }
}

//! Timeline persistence.
//!
//! The engine needs three operations with read-your-writes consistency per
//! deal: [`TimelineStore::get`], [`TimelineStore::put`] and
//! [`TimelineStore::get_or_create`]. A command is durable once `put` returns.

mod file;
mod memory;
pub mod serialization;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::timeline::TimelineRecord;

pub use file::FileTimelineStore;
pub use memory::MemoryTimelineStore;

pub trait TimelineStore {
    fn get(&self, deal_id: &str) -> Result<Option<TimelineRecord>>;

    fn put(&self, deal_id: &str, record: &TimelineRecord) -> Result<()>;

    /// Load the deal's timeline, creating and persisting a fresh one (first
    /// stage in progress, the rest pending) if none exists.
    fn get_or_create(&self, deal_id: &str, now: DateTime<Utc>) -> Result<TimelineRecord> {
        if let Some(record) = self.get(deal_id)? {
            return Ok(record);
        }

        let record = TimelineRecord::new(deal_id, now);
        self.put(deal_id, &record)?;
        info!(deal_id, "timeline created");
        Ok(record)
    }
}

impl<T: TimelineStore + ?Sized> TimelineStore for &T {
    fn get(&self, deal_id: &str) -> Result<Option<TimelineRecord>> {
        (**self).get(deal_id)
    }

    fn put(&self, deal_id: &str, record: &TimelineRecord) -> Result<()> {
        (**self).put(deal_id, record)
    }

    fn get_or_create(&self, deal_id: &str, now: DateTime<Utc>) -> Result<TimelineRecord> {
        (**self).get_or_create(deal_id, now)
    }
}

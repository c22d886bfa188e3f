//! Session storage that evicts. Entries leave the cache once idle for the
//! inactivity window, once their cookie expiry passes, or when the summed
//! size of all session data would exceed the byte budget.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::{SessionStore, session_store};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct SessionCache {
    records: Cache<Id, Record>,
}

/// Approximate in-memory size of a record: keys plus serialised values.
fn record_weight(_id: &Id, record: &Record) -> u32 {
    let bytes: usize = record
        .data
        .iter()
        .map(|(key, value)| key.len() + serde_json::to_vec(value).map_or(0, |json| json.len()))
        .sum();
    u32::try_from(bytes).unwrap_or(u32::MAX)
}

impl SessionCache {
    pub(crate) fn new(max_bytes: u64, idle: Duration) -> Self {
        Self {
            records: Cache::builder()
                .weigher(record_weight)
                .max_capacity(max_bytes)
                .time_to_idle(idle)
                .build(),
        }
    }
}

impl fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache")
            .field("entries", &self.records.entry_count())
            .field("weighted_size", &self.records.weighted_size())
            .finish()
    }
}

#[async_trait]
impl SessionStore for SessionCache {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let Some(record) = self.records.get(session_id).await else {
            return Ok(None);
        };
        if record.expiry_date <= OffsetDateTime::now_utc() {
            debug!("Dropping expired session");
            self.records.invalidate(session_id).await;
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}

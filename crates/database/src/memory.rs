//! In-memory release store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::MovieRelease;
use crate::store::{apply_subscription, ReleaseStore, SubscribeOutcome};

/// A `ReleaseStore` kept in process memory.
///
/// The map lock is held across the whole read-modify-write, which makes every
/// operation atomic. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryReleaseStore {
    records: Arc<Mutex<BTreeMap<i64, MovieRelease>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryReleaseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `records`. Seeding does not count as a write.
    pub fn with_records(records: impl IntoIterator<Item = MovieRelease>) -> Self {
        let map = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: Arc::new(Mutex::new(map)),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of record writes performed so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Fetch one record.
    pub async fn get(&self, id: i64) -> Option<MovieRelease> {
        self.records.lock().await.get(&id).cloned()
    }
}

#[async_trait]
impl ReleaseStore for MemoryReleaseStore {
    async fn upsert_subscription(
        &self,
        snapshot: &MovieRelease,
        chat_id: i64,
    ) -> Result<SubscribeOutcome> {
        let mut records = self.records.lock().await;
        let existing = records.get(&snapshot.id).cloned();

        match apply_subscription(existing, snapshot, chat_id) {
            Some(record) => {
                records.insert(record.id, record);
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(SubscribeOutcome::Subscribed)
            }
            None => Ok(SubscribeOutcome::AlreadySubscribed),
        }
    }

    async fn list_all(&self) -> Result<Vec<MovieRelease>> {
        let records = self.records.lock().await;
        let mut all: Vec<MovieRelease> = records.values().cloned().collect();
        all.sort_by(|a, b| a.release_date.cmp(&b.release_date).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn save_release(&self, release: &MovieRelease) -> Result<()> {
        let mut records = self.records.lock().await;
        let stored = records
            .entry(release.id)
            .or_insert_with(|| MovieRelease::new(release.id, release.title.clone(), release.release_date));

        stored.title = release.title.clone();
        stored.release_date = release.release_date;
        for subscriber in &release.subscribers {
            match stored
                .subscribers
                .iter_mut()
                .find(|s| s.chat_id == subscriber.chat_id)
            {
                Some(existing) => existing.notified |= subscriber.notified,
                None => stored.subscribers.push(*subscriber),
            }
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn prune_expired(&self, before: NaiveDate) -> Result<u64> {
        let mut records = self.records.lock().await;
        let len_before = records.len();
        records.retain(|_, r| !(r.release_date < before && r.all_notified()));
        Ok((len_before - records.len()) as u64)
    }
}

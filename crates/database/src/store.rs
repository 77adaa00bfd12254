//! The `ReleaseStore` trait and its SQLite backend.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::MovieRelease;
use crate::{release, Database};

/// Result of a subscribe upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// The chat was added to the release.
    Subscribed,
    /// The chat was already subscribed; nothing was written.
    AlreadySubscribed,
}

/// Persistent store of movie releases and their subscribers.
///
/// Abstracted so the bot can run against SQLite or an in-memory map.
#[async_trait]
pub trait ReleaseStore: Send + Sync {
    /// Atomically subscribe `chat_id` to the release identified by `snapshot.id`.
    ///
    /// If no record exists it is seeded from `snapshot` (its subscribers are
    /// ignored). Subscribing twice is a no-op.
    async fn upsert_subscription(
        &self,
        snapshot: &MovieRelease,
        chat_id: i64,
    ) -> Result<SubscribeOutcome>;

    /// Read every release record.
    async fn list_all(&self) -> Result<Vec<MovieRelease>>;

    /// Write a release record back.
    ///
    /// Subscribers missing from `release` are kept and `notified` never goes
    /// back to false, so a concurrent subscribe is not lost.
    async fn save_release(&self, release: &MovieRelease) -> Result<()>;

    /// Delete records released before `before` whose subscribers were all notified.
    async fn prune_expired(&self, before: NaiveDate) -> Result<u64>;
}

/// The read-modify-write step of a subscribe upsert.
///
/// Returns the record to write, or `None` when `chat_id` is already subscribed.
pub fn apply_subscription(
    existing: Option<MovieRelease>,
    snapshot: &MovieRelease,
    chat_id: i64,
) -> Option<MovieRelease> {
    let mut record = existing.unwrap_or_else(|| {
        MovieRelease::new(snapshot.id, snapshot.title.clone(), snapshot.release_date)
    });

    if record.add_subscriber(chat_id) {
        Some(record)
    } else {
        None
    }
}

/// SQLite-backed release store.
///
/// Write transactions start with a write statement, so concurrent writers
/// queue on the busy timeout instead of failing to upgrade a read snapshot.
#[derive(Debug, Clone)]
pub struct SqliteReleaseStore {
    db: Database,
}

impl SqliteReleaseStore {
    /// Wrap a connected and migrated database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ReleaseStore for SqliteReleaseStore {
    async fn upsert_subscription(
        &self,
        snapshot: &MovieRelease,
        chat_id: i64,
    ) -> Result<SubscribeOutcome> {
        let mut tx = self.db.pool().begin().await?;

        release::insert_release_if_missing(&mut tx, snapshot).await?;
        let added = release::insert_subscriber_if_missing(&mut tx, snapshot.id, chat_id).await?;
        tx.commit().await?;

        if added {
            info!(release_id = snapshot.id, chat_id, "Subscribed to release");
            Ok(SubscribeOutcome::Subscribed)
        } else {
            debug!(release_id = snapshot.id, chat_id, "Already subscribed");
            Ok(SubscribeOutcome::AlreadySubscribed)
        }
    }

    async fn list_all(&self) -> Result<Vec<MovieRelease>> {
        release::list_releases(self.db.pool()).await
    }

    async fn save_release(&self, record: &MovieRelease) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        release::put_release(&mut tx, record).await?;
        for subscriber in &record.subscribers {
            release::put_subscriber(&mut tx, record.id, subscriber).await?;
        }
        tx.commit().await?;

        debug!(release_id = record.id, "Saved release");
        Ok(())
    }

    async fn prune_expired(&self, before: NaiveDate) -> Result<u64> {
        let deleted = release::delete_expired_releases(self.db.pool(), before).await?;
        if deleted > 0 {
            info!(deleted, "Pruned expired releases");
        }
        Ok(deleted)
    }
}

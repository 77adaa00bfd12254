//! Concurrent writers against a file database with a multi-connection pool.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use database::{
    sqlite_url_from_path, Database, MovieRelease, ReleaseStore, SqliteReleaseStore,
    SubscribeOutcome,
};

/// A database file that is removed (with its WAL files) on drop.
struct TempDb {
    path: PathBuf,
}

impl TempDb {
    fn new(name: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "release-store-{}-{}-{}.db",
            name,
            std::process::id(),
            nanos
        ));
        Self { path }
    }

    async fn store(&self) -> SqliteReleaseStore {
        let url = sqlite_url_from_path(&self.path.to_string_lossy());
        let db = Database::connect(&url).await.unwrap();
        db.migrate().await.unwrap();
        SqliteReleaseStore::new(db)
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

fn release(id: i64) -> MovieRelease {
    MovieRelease::new(
        id,
        format!("Release {}", id),
        NaiveDate::from_ymd_opt(2019, 2, 14).unwrap(),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_subscribes_all_succeed() {
    let temp = TempDb::new("subscribes");
    let store = temp.store().await;

    for round in 0..20 {
        let id = 1000 + round;
        let tasks: Vec<_> = (0..5)
            .map(|chat_id| {
                let store = store.clone();
                tokio::spawn(async move { store.upsert_subscription(&release(id), chat_id).await })
            })
            .collect();

        for task in tasks {
            let outcome = task.await.unwrap().unwrap();
            assert_eq!(outcome, SubscribeOutcome::Subscribed);
        }
    }

    let records = store.list_all().await.unwrap();
    assert_eq!(records.len(), 20);
    assert!(records.iter().all(|r| r.subscribers.len() == 5));

    store.db().close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_subscribe_races_notifier_write_back() {
    let temp = TempDb::new("write-back");
    let store = temp.store().await;

    for round in 0..50 {
        let id = 2000 + round;
        store.upsert_subscription(&release(id), 1).await.unwrap();

        let mut notified = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .find(|r| r.id == id)
            .unwrap();
        notified.subscribers[0].notified = true;

        let writer = store.clone();
        let subscriber = store.clone();
        let (saved, subscribed) = tokio::join!(
            tokio::spawn(async move { writer.save_release(&notified).await }),
            tokio::spawn(async move { subscriber.upsert_subscription(&release(id), 2).await }),
        );
        saved.unwrap().unwrap();
        assert_eq!(subscribed.unwrap().unwrap(), SubscribeOutcome::Subscribed);

        let record = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .find(|r| r.id == id)
            .unwrap();
        let flags: Vec<(i64, bool)> = record
            .subscribers
            .iter()
            .map(|s| (s.chat_id, s.notified))
            .collect();
        assert_eq!(flags, vec![(1, true), (2, false)]);
    }

    store.db().close().await;
}

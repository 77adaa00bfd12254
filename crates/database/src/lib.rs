//! SQLite persistence layer for the release bot.
//!
//! This crate stores movie releases and the chats subscribed to them using
//! SQLx with SQLite. Callers work through the [`ReleaseStore`] trait, which has
//! a SQLite backend ([`SqliteReleaseStore`]) and an in-memory one
//! ([`MemoryReleaseStore`]).
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use database::{Database, MovieRelease, ReleaseStore, SqliteReleaseStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:releases.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let store = SqliteReleaseStore::new(db);
//!     let release = MovieRelease::new(
//!         399579,
//!         "Alita: Battle Angel",
//!         NaiveDate::from_ymd_opt(2019, 2, 14).unwrap(),
//!     );
//!     store.upsert_subscription(&release, 42).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod release;
pub mod store;

pub use error::{DatabaseError, Result};
pub use memory::MemoryReleaseStore;
pub use models::{MovieRelease, Subscriber};
pub use store::{apply_subscription, ReleaseStore, SqliteReleaseStore, SubscribeOutcome};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/releases.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing; use a single connection)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Turn a plain file path into a `sqlite:` URL; URLs pass through unchanged.
pub fn sqlite_url_from_path(path: &str) -> String {
    if path.starts_with("sqlite:") {
        path.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", path)
    }
}

//! Movie release and subscriber queries.
//!
//! Functions taking a `SqliteConnection` are meant to run inside a
//! transaction; pass `&mut *tx`.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::Result;
use crate::models::{MovieRelease, ReleaseRow, Subscriber, SubscriberRow};

/// Insert a release row unless one with the same id exists.
pub async fn insert_release_if_missing(
    conn: &mut SqliteConnection,
    release: &MovieRelease,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO movie_releases (id, title, release_date)
        VALUES (?, ?, ?)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(release.id)
    .bind(&release.title)
    .bind(release.release_date)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Add an unnotified subscriber. Returns false if the chat was already subscribed.
pub async fn insert_subscriber_if_missing(
    conn: &mut SqliteConnection,
    release_id: i64,
    chat_id: i64,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO release_subscribers (release_id, chat_id, notified)
        VALUES (?, ?, 0)
        ON CONFLICT (release_id, chat_id) DO NOTHING
        "#,
    )
    .bind(release_id)
    .bind(chat_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Insert or update a release row. Subscribers are untouched.
pub async fn put_release(conn: &mut SqliteConnection, release: &MovieRelease) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO movie_releases (id, title, release_date)
        VALUES (?, ?, ?)
        ON CONFLICT (id) DO UPDATE
        SET title = excluded.title, release_date = excluded.release_date
        "#,
    )
    .bind(release.id)
    .bind(&release.title)
    .bind(release.release_date)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Insert or update a subscriber.
///
/// An existing `notified = true` is never reset to false.
pub async fn put_subscriber(
    conn: &mut SqliteConnection,
    release_id: i64,
    subscriber: &Subscriber,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO release_subscribers (release_id, chat_id, notified)
        VALUES (?, ?, ?)
        ON CONFLICT (release_id, chat_id) DO UPDATE
        SET notified = MAX(notified, excluded.notified)
        "#,
    )
    .bind(release_id)
    .bind(subscriber.chat_id)
    .bind(subscriber.notified)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// List every release with its subscribers, soonest release first.
pub async fn list_releases(pool: &SqlitePool) -> Result<Vec<MovieRelease>> {
    let rows = sqlx::query_as::<_, ReleaseRow>(
        r#"
        SELECT id, title, release_date
        FROM movie_releases
        ORDER BY release_date, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let subscriber_rows = sqlx::query_as::<_, SubscriberRow>(
        r#"
        SELECT release_id, chat_id, notified
        FROM release_subscribers
        ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut subscribers: HashMap<i64, Vec<Subscriber>> = HashMap::new();
    for row in subscriber_rows {
        subscribers.entry(row.release_id).or_default().push(Subscriber {
            chat_id: row.chat_id,
            notified: row.notified,
        });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = row.id;
            let mut release = MovieRelease::from(row);
            release.subscribers = subscribers.remove(&id).unwrap_or_default();
            release
        })
        .collect())
}

/// Delete releases dated before `before` whose subscribers were all notified.
pub async fn delete_expired_releases(pool: &SqlitePool, before: NaiveDate) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM movie_releases
        WHERE release_date < ?
          AND NOT EXISTS (
              SELECT 1
              FROM release_subscribers s
              WHERE s.release_id = movie_releases.id AND s.notified = 0
          )
        "#,
    )
    .bind(before)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

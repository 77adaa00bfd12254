//! Database models.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A chat subscribed to a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Chat the notification is sent to.
    pub chat_id: i64,
    /// Whether the release notification was already sent. Only moves false -> true.
    pub notified: bool,
}

impl Subscriber {
    /// A subscriber that has not been notified yet.
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            notified: false,
        }
    }
}

/// A movie release and the chats waiting for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRelease {
    /// Catalog identifier (primary key).
    pub id: i64,
    /// Movie title.
    pub title: String,
    /// Release date.
    pub release_date: NaiveDate,
    /// Subscribers, at most one per chat.
    pub subscribers: Vec<Subscriber>,
}

impl MovieRelease {
    /// A release record without subscribers.
    pub fn new(id: i64, title: impl Into<String>, release_date: NaiveDate) -> Self {
        Self {
            id,
            title: title.into(),
            release_date,
            subscribers: Vec::new(),
        }
    }

    /// Release date as an instant (midnight UTC).
    pub fn release_instant(&self) -> DateTime<Utc> {
        self.release_date.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Whether the release falls strictly inside `(now, now + window)`.
    pub fn is_within_window(&self, now: DateTime<Utc>, window: Duration) -> bool {
        let release = self.release_instant();
        release > now && release < now + window
    }

    /// Whether `chat_id` is subscribed.
    pub fn has_subscriber(&self, chat_id: i64) -> bool {
        self.subscribers.iter().any(|s| s.chat_id == chat_id)
    }

    /// Add `chat_id` unless it is already subscribed. Returns whether it was added.
    pub fn add_subscriber(&mut self, chat_id: i64) -> bool {
        if self.has_subscriber(chat_id) {
            return false;
        }
        self.subscribers.push(Subscriber::new(chat_id));
        true
    }

    /// Whether every subscriber has been notified.
    pub fn all_notified(&self) -> bool {
        self.subscribers.iter().all(|s| s.notified)
    }
}

/// Row of the `movie_releases` table.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ReleaseRow {
    pub id: i64,
    pub title: String,
    pub release_date: NaiveDate,
}

/// Row of the `release_subscribers` table.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct SubscriberRow {
    pub release_id: i64,
    pub chat_id: i64,
    pub notified: bool,
}

impl From<ReleaseRow> for MovieRelease {
    fn from(row: ReleaseRow) -> Self {
        MovieRelease::new(row.id, row.title, row.release_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn release(date: (i32, u32, u32)) -> MovieRelease {
        MovieRelease::new(
            1,
            "Alita: Battle Angel",
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        )
    }

    #[test]
    fn test_add_subscriber_is_idempotent() {
        let mut record = release((2019, 2, 14));
        assert!(record.add_subscriber(42));
        assert!(!record.add_subscriber(42));
        assert!(record.add_subscriber(7));
        assert_eq!(record.subscribers.len(), 2);
        assert!(!record.subscribers[0].notified);
    }

    #[test]
    fn test_window_is_open_on_both_ends() {
        let now = Utc.with_ymd_and_hms(2019, 2, 7, 0, 0, 0).unwrap();
        let week = Duration::days(7);

        assert!(release((2019, 2, 8)).is_within_window(now, week));
        assert!(release((2019, 2, 13)).is_within_window(now, week));
        // Exactly now + 7 days is outside.
        assert!(!release((2019, 2, 14)).is_within_window(now, week));
        // Exactly now is outside.
        assert!(!release((2019, 2, 7)).is_within_window(now, week));
        assert!(!release((2019, 1, 1)).is_within_window(now, week));
    }

    #[test]
    fn test_all_notified() {
        let mut record = release((2019, 2, 14));
        assert!(record.all_notified());
        record.add_subscriber(1);
        assert!(!record.all_notified());
        record.subscribers[0].notified = true;
        assert!(record.all_notified());
    }
}

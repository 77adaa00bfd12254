//! Release-window notifier.
//!
//! A pass reads every release record, messages each not-yet-notified
//! subscriber of a release inside the window, and writes the records back.
//! A subscriber is marked notified only after its message was delivered, so
//! a failed send is retried on the next pass.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use database::ReleaseStore;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::formatting::{notification_text, Markup};
use crate::sender::MessageSender;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Notifier settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Releases strictly between now and now + window are notified.
    pub window: Duration,
    /// Delete past releases whose subscribers were all notified.
    pub prune_expired: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            window: Duration::days(7),
            prune_expired: false,
        }
    }
}

/// Summary of one notifier pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NotifyReport {
    /// Records whose release date fell inside the window.
    pub releases_in_window: usize,
    /// Messages delivered.
    pub notified: usize,
    /// Messages that failed and will be retried.
    pub failed: usize,
    /// Records deleted by pruning.
    pub pruned: u64,
}

/// Whole days until `release`, rounded up.
pub fn days_until(now: DateTime<Utc>, release: DateTime<Utc>) -> i64 {
    let millis = (release - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Sends release reminders to subscribers.
#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn ReleaseStore>,
    sender: Arc<dyn MessageSender>,
    config: NotifierConfig,
}

impl Notifier {
    pub fn new(
        store: Arc<dyn ReleaseStore>,
        sender: Arc<dyn MessageSender>,
        config: NotifierConfig,
    ) -> Self {
        Self {
            store,
            sender,
            config,
        }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Run one pass at the current time.
    pub async fn run(&self) -> Result<NotifyReport> {
        self.run_at(Utc::now()).await
    }

    /// Run one pass as if it were `now`.
    ///
    /// Only the initial read fails the pass. Send, write-back and prune
    /// failures are logged and leave the affected subscribers for a later pass.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<NotifyReport> {
        let releases = self.store.list_all().await?;
        let mut report = NotifyReport::default();

        for mut release in releases
            .into_iter()
            .filter(|release| release.is_within_window(now, self.config.window))
        {
            report.releases_in_window += 1;

            let days = days_until(now, release.release_instant());
            let text = notification_text(&release.title, days);

            for subscriber in release.subscribers.iter_mut().filter(|s| !s.notified) {
                match self
                    .sender
                    .send_message(subscriber.chat_id, &text, Markup::Plain)
                    .await
                {
                    Ok(()) => {
                        subscriber.notified = true;
                        report.notified += 1;
                    }
                    Err(e) => {
                        warn!(
                            chat_id = subscriber.chat_id,
                            release_id = release.id,
                            "Failed to send release reminder: {}",
                            e
                        );
                        report.failed += 1;
                    }
                }
            }

            if let Err(e) = self.store.save_release(&release).await {
                error!(release_id = release.id, "Failed to save release: {}", e);
            }
        }

        if self.config.prune_expired {
            match self.store.prune_expired(now.date_naive()).await {
                Ok(pruned) => report.pruned = pruned,
                Err(e) => error!("Failed to prune expired releases: {}", e),
            }
        }

        info!(
            releases_in_window = report.releases_in_window,
            notified = report.notified,
            failed = report.failed,
            pruned = report.pruned,
            "Notifier pass complete"
        );
        Ok(report)
    }
}

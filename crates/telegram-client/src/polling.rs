//! Long polling for updates via `getUpdates`.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::TelegramClient;
use crate::types::Update;

/// Configuration for the long polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Long polling timeout sent to the API.
    pub timeout: Duration,
    /// Initial delay before retrying after a failed poll.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each consecutive failure.
    pub backoff_multiplier: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl PollConfig {
    /// Calculate delay for a given number of consecutive failures.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }
}

/// Poll for updates and forward them to `updates` in arrival order.
///
/// Runs until the receiving side of `updates` is dropped. Failed polls are
/// retried with exponential backoff.
pub async fn poll_updates(
    client: TelegramClient,
    updates: mpsc::Sender<Update>,
    config: PollConfig,
) {
    info!("Polling for updates (timeout: {:?})", config.timeout);

    let mut offset: Option<i64> = None;
    let mut failures = 0u32;

    loop {
        match client.get_updates(offset, config.timeout).await {
            Ok(batch) => {
                if failures > 0 {
                    info!("Polling restored after {} failures", failures);
                }
                failures = 0;

                if batch.next_offset.is_some() {
                    offset = batch.next_offset;
                }

                for update in batch.updates {
                    debug!("Received update {}", update.update_id);
                    if updates.send(update).await.is_err() {
                        info!("Update receiver closed, stopping poller");
                        return;
                    }
                }
            }
            Err(e) => {
                let delay = config.delay_for_attempt(failures);
                failures = failures.saturating_add(1);
                warn!(
                    "getUpdates failed: {} (failures: {}, retrying in {:?})",
                    e, failures, delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        if updates.is_closed() {
            info!("Update receiver closed, stopping poller");
            return;
        }
    }
}

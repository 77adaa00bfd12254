//! Application state shared across handlers.

use std::sync::Arc;

use telegram_client::Update;
use tokio::sync::mpsc;

use crate::notifier::Notifier;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Queue feeding the update processor.
    pub updates: mpsc::Sender<Update>,
    /// Release notifier.
    pub notifier: Arc<Notifier>,
    /// Bot token the webhook path must carry.
    pub webhook_token: Arc<str>,
}

impl AppState {
    /// Create new application state.
    pub fn new(updates: mpsc::Sender<Update>, notifier: Notifier, webhook_token: &str) -> Self {
        Self {
            updates,
            notifier: Arc::new(notifier),
            webhook_token: Arc::from(webhook_token),
        }
    }
}

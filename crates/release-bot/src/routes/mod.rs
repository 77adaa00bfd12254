//! HTTP routes.

pub mod health;
pub mod tasks;
pub mod webhook;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Bot API webhook
        .route("/telegram/:token", post(webhook::receive_update))
        // Scheduled notifier pass
        .route("/tasks/notify", get(tasks::notify).post(tasks::notify))
        // Health check
        .route("/health", get(health::health))
}

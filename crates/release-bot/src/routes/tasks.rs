//! Notifier task endpoint, hit by an external scheduler.

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::error::Result;
use crate::notifier::NotifyReport;
use crate::state::AppState;

/// Run one notifier pass and report what it did.
pub async fn notify(State(state): State<AppState>) -> Result<Json<NotifyReport>> {
    info!("Notifier pass triggered");
    let report = state.notifier.run().await?;
    Ok(Json(report))
}

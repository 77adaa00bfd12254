//! Bot API webhook receiver.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use telegram_client::Update;
use tracing::{debug, error, warn};

use crate::state::AppState;

/// Accept an update and queue it for the processor.
///
/// The update is acknowledged as soon as it is queued so the Bot API does
/// not redeliver it while the reply is being prepared.
pub async fn receive_update(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(update): Json<Update>,
) -> StatusCode {
    if token != *state.webhook_token {
        warn!("Rejected webhook call with unknown token");
        return StatusCode::NOT_FOUND;
    }

    debug!(update_id = update.update_id, "Received update");
    match state.updates.send(update).await {
        Ok(()) => StatusCode::OK,
        Err(_) => {
            error!("Update processor is gone, rejecting update");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

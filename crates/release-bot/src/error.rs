//! Error types for the release bot.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use movie_catalog::CatalogError;
use telegram_client::TelegramError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while handling a message or a notifier pass.
#[derive(Debug, Error)]
pub enum BotError {
    /// Movie catalog search failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Subscription store failed.
    #[error("store error: {0}")]
    Store(#[from] DatabaseError),

    /// Sending a chat message failed.
    #[error("send failed: {0}")]
    Send(#[from] TelegramError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse failure classes, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An outbound HTTP or chat call failed.
    Transport,
    /// The catalog answered with a non-success status.
    BadResponseStatus,
    /// JSON or date parsing failed.
    MalformedResponse,
    /// A read, write or transaction against the store failed.
    Store,
    /// The process is misconfigured.
    Config,
}

impl BotError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BotError::Catalog(err) => match err {
                CatalogError::Transport(_) => ErrorKind::Transport,
                CatalogError::BadResponseStatus(_) => ErrorKind::BadResponseStatus,
                CatalogError::MalformedResponse(_) | CatalogError::InvalidReleaseDate { .. } => {
                    ErrorKind::MalformedResponse
                }
                CatalogError::Configuration(_) => ErrorKind::Config,
            },
            BotError::Store(_) => ErrorKind::Store,
            BotError::Send(err) => match err {
                TelegramError::Json(_) => ErrorKind::MalformedResponse,
                TelegramError::Config(_) => ErrorKind::Config,
                TelegramError::Http(_) | TelegramError::Api { .. } => ErrorKind::Transport,
            },
            BotError::Config(_) => ErrorKind::Config,
        }
    }
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        tracing::error!(kind = ?self.kind(), "Request failed: {}", self);

        let body = serde_json::json!({
            "error": format!("{:?}", self.kind()),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let status = BotError::from(CatalogError::BadResponseStatus(
            reqwest_status(503),
        ));
        assert_eq!(status.kind(), ErrorKind::BadResponseStatus);

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            BotError::from(CatalogError::MalformedResponse(json)).kind(),
            ErrorKind::MalformedResponse
        );

        let missing = BotError::from(DatabaseError::Sqlx(sqlx::Error::RowNotFound));
        assert_eq!(missing.kind(), ErrorKind::Store);

        let blocked = BotError::from(TelegramError::Api {
            code: 403,
            description: "Forbidden".to_string(),
        });
        assert_eq!(blocked.kind(), ErrorKind::Transport);
    }

    fn reqwest_status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }
}

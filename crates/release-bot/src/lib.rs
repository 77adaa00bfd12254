//! Telegram bot for upcoming movie releases.
//!
//! Users search the movie catalog for releases, subscribe to an upcoming
//! release by title and list their subscriptions. A notifier pass, triggered
//! over HTTP by an external scheduler, reminds each subscriber once when the
//! release enters the notification window.
//!
//! Updates arrive by webhook when a public host is configured and by long
//! polling otherwise. Both feed the same [`processor::UpdateProcessor`].
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/telegram/:token` | Bot API webhook |
//! | GET, POST | `/tasks/notify` | Run one notifier pass |
//! | GET | `/health` | Liveness check |

pub mod command;
pub mod config;
pub mod error;
pub mod formatting;
pub mod handler;
pub mod notifier;
pub mod processor;
pub mod routes;
pub mod sender;
pub mod state;

pub use config::BotConfig;
pub use error::{BotError, Result};
pub use handler::ConversationHandler;
pub use notifier::{Notifier, NotifierConfig, NotifyReport};
pub use processor::{ProcessResult, UpdateProcessor};
pub use sender::MessageSender;
pub use state::AppState;

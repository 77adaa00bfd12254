//! Wire types for the Bot API.

mod send;
mod update;

pub use send::{GetUpdatesParams, ParseMode, SendMessageParams, WebhookParams};
pub use update::{ApiResponse, BotUser, Chat, Message, Update, UpdateBatch, WebhookInfo};

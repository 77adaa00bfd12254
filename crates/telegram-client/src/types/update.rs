//! Update and message types received from the Bot API.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Envelope every Bot API method answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,

    /// Payload when `ok` is true.
    pub result: Option<T>,

    /// Human readable error when `ok` is false.
    #[serde(default)]
    pub description: Option<String>,

    /// Error code when `ok` is false.
    #[serde(default)]
    pub error_code: Option<i32>,
}

/// An incoming update, delivered by webhook or `getUpdates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier.
    pub update_id: i64,

    /// New incoming message of any kind.
    #[serde(default)]
    pub message: Option<Message>,
}

impl Update {
    /// Chat id and text of a text message, if this update carries one.
    pub fn text_message(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        if text.is_empty() {
            return None;
        }
        Some((message.chat.id, text))
    }
}

/// Updates returned by one `getUpdates` call.
#[derive(Debug, Clone, Default)]
pub struct UpdateBatch {
    /// Updates that decoded, in arrival order.
    pub updates: Vec<Update>,

    /// Offset that confirms every update in the batch, decodable or not.
    pub next_offset: Option<i64>,
}

impl UpdateBatch {
    /// Decode raw updates one by one.
    ///
    /// An update that fails to decode is logged and dropped, but its
    /// `update_id` still advances the offset so it is not fetched again.
    pub fn from_raw(raw: Vec<serde_json::Value>) -> Self {
        let mut batch = Self::default();

        for value in raw {
            let update_id = value.get("update_id").and_then(serde_json::Value::as_i64);
            if let Some(id) = update_id {
                batch.next_offset = Some(batch.next_offset.map_or(id + 1, |o| o.max(id + 1)));
            }

            match serde_json::from_value::<Update>(value) {
                Ok(update) => batch.updates.push(update),
                Err(e) => warn!(?update_id, "Skipping undecodable update: {}", e),
            }
        }

        batch
    }
}

/// A message sent to the bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier inside the chat.
    pub message_id: i64,

    /// Sender, empty for messages sent to channels.
    #[serde(default)]
    pub from: Option<BotUser>,

    /// Unix time the message was sent.
    #[serde(default)]
    pub date: i64,

    /// Conversation the message belongs to.
    pub chat: Chat,

    /// UTF-8 text of the message.
    #[serde(default)]
    pub text: Option<String>,
}

/// A chat (private, group, supergroup or channel).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chat {
    /// Unique chat identifier; the address replies and notifications go to.
    pub id: i64,

    /// Chat type ("private", "group", ...).
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Username for private chats, if set.
    #[serde(default)]
    pub username: Option<String>,
}

/// A Telegram user or bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotUser {
    /// Unique identifier.
    pub id: i64,

    /// True if this user is a bot.
    #[serde(default)]
    pub is_bot: bool,

    /// First name.
    #[serde(default)]
    pub first_name: String,

    /// Username.
    #[serde(default)]
    pub username: Option<String>,
}

/// Current status of the registered webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookInfo {
    /// Webhook URL, empty if none is set.
    #[serde(default)]
    pub url: String,

    /// Number of updates awaiting delivery.
    #[serde(default)]
    pub pending_update_count: u32,

    /// Unix time of the most recent delivery error, 0 if none.
    #[serde(default)]
    pub last_error_date: i64,

    /// Error message of the most recent delivery error.
    #[serde(default)]
    pub last_error_message: Option<String>,
}

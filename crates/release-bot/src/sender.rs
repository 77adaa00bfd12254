//! Message sender trait and implementations.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use telegram_client::{ParseMode, TelegramClient, TelegramError};

use crate::error::BotError;
use crate::formatting::{Markup, Reply};

/// Trait for sending chat messages.
///
/// Abstracted to support different transports (Telegram, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send `text` to `chat_id`.
    async fn send_message(&self, chat_id: i64, text: &str, markup: Markup)
        -> Result<(), BotError>;

    /// Send a prepared reply (convenience wrapper).
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<(), BotError> {
        self.send_message(chat_id, &reply.text, reply.markup).await
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Markup,
    ) -> Result<(), BotError> {
        let parse_mode = match markup {
            Markup::Plain => None,
            Markup::Markdown => Some(ParseMode::Markdown),
        };
        TelegramClient::send_message(self, chat_id, text, parse_mode).await?;
        Ok(())
    }
}

/// A message recorded by [`RecordingSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub markup: Markup,
}

/// A sender for tests that records every message instead of sending it.
///
/// Chats registered with [`RecordingSender::fail_for`] get a send error.
#[derive(Debug, Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: Arc<Mutex<Vec<i64>>>,
}

impl RecordingSender {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to `chat_id` fail.
    pub fn fail_for(&self, chat_id: i64) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.push(chat_id);
        }
    }

    /// Messages sent so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Texts sent to `chat_id`.
    pub fn texts_for(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text)
            .collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Markup,
    ) -> Result<(), BotError> {
        let fails = self
            .failing
            .lock()
            .map(|failing| failing.contains(&chat_id))
            .unwrap_or(false);
        if fails {
            return Err(BotError::Send(TelegramError::Api {
                code: 403,
                description: "Forbidden: bot was blocked by the user".to_string(),
            }));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMessage {
                chat_id,
                text: text.to_string(),
                markup,
            });
        }
        Ok(())
    }
}

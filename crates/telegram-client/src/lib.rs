//! Telegram Bot API client library.
//!
//! This crate provides a small Rust client for the Telegram Bot API over
//! HTTPS. It supports:
//!
//! - Sending text messages (plain or Markdown)
//! - Registering and inspecting a webhook
//! - Long polling for updates when no webhook is registered
//!
//! # Example
//!
//! ```no_run
//! use telegram_client::{ParseMode, TelegramClient, TelegramConfig};
//!
//! # async fn example() -> Result<(), telegram_client::TelegramError> {
//! let config = TelegramConfig::new("123456:ABC-DEF");
//! let client = TelegramClient::connect(config).await?;
//!
//! client.send_message(42, "Hello!", None).await?;
//! client
//!     .send_message(42, "`releases <title>`", Some(ParseMode::Markdown))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod polling;
pub mod types;

pub use client::TelegramClient;
pub use config::TelegramConfig;
pub use error::TelegramError;
pub use polling::{poll_updates, PollConfig};
pub use types::*;

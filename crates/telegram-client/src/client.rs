//! Telegram Bot API HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TelegramConfig;
use crate::error::TelegramError;
use crate::types::{
    ApiResponse, BotUser, GetUpdatesParams, Message, ParseMode, SendMessageParams, UpdateBatch,
    WebhookInfo, WebhookParams,
};

/// Timeout for regular API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra slack on top of the long polling timeout for `getUpdates`.
const LONG_POLL_SLACK: Duration = Duration::from_secs(10);

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Create a client without contacting the API.
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        if config.token.trim().is_empty() {
            return Err(TelegramError::Config("bot token is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(TelegramError::Http)?;

        Ok(Self { http, config })
    }

    /// Create a client and verify the token with `getMe`.
    pub async fn connect(config: TelegramConfig) -> Result<Self, TelegramError> {
        let client = Self::new(config)?;
        let me = client.get_me().await?;
        info!(
            "Authorized on account {}",
            me.username.as_deref().unwrap_or(&me.first_name)
        );
        Ok(client)
    }

    /// Get the bot's own user.
    pub async fn get_me(&self) -> Result<BotUser, TelegramError> {
        self.call::<(), _>("getMe", None).await
    }

    /// Send a message using the full params structure.
    pub async fn send(&self, params: SendMessageParams) -> Result<Message, TelegramError> {
        self.call("sendMessage", Some(params)).await
    }

    /// Send a text message with an optional parse mode.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<Message, TelegramError> {
        let params = SendMessageParams::text(chat_id, text);
        let params = match parse_mode {
            Some(mode) => params.with_parse_mode(mode),
            None => params,
        };
        self.send(params).await
    }

    /// Register `url` as the webhook for incoming updates.
    pub async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        let params = WebhookParams {
            url: url.to_string(),
            allowed_updates: vec!["message".to_string()],
        };
        let _: bool = self.call("setWebhook", Some(params)).await?;
        Ok(())
    }

    /// Remove the webhook so `getUpdates` can be used.
    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let _: bool = self.call::<(), _>("deleteWebhook", None).await?;
        Ok(())
    }

    /// Inspect the current webhook registration.
    pub async fn get_webhook_info(&self) -> Result<WebhookInfo, TelegramError> {
        self.call::<(), _>("getWebhookInfo", None).await
    }

    /// Long poll for updates starting at `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<UpdateBatch, TelegramError> {
        let params = GetUpdatesParams {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: vec!["message".to_string()],
        };
        let request = self
            .http
            .post(self.config.method_url("getUpdates"))
            .timeout(timeout + LONG_POLL_SLACK)
            .json(&params);
        let raw: Vec<serde_json::Value> = self.execute("getUpdates", request).await?;
        Ok(UpdateBatch::from_raw(raw))
    }

    /// Get the configuration.
    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// Make a Bot API call with optional JSON parameters.
    async fn call<P: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: Option<P>,
    ) -> Result<R, TelegramError> {
        let mut request = self.http.post(self.config.method_url(method));
        if let Some(ref params) = params {
            request = request.json(params);
        }
        self.execute(method, request).await
    }

    async fn execute<R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<R, TelegramError> {
        debug!("Bot API call: {}", method);

        // Request URLs embed the bot token.
        let response = request
            .send()
            .await
            .map_err(|e| TelegramError::Http(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TelegramError::Http(e.without_url()))?;

        // Error responses still carry the JSON envelope, so decode before checking status.
        let api_response: ApiResponse<R> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Api {
                    code: i32::from(status.as_u16()),
                    description: body,
                })
            }
            Err(e) => return Err(TelegramError::Json(e)),
        };

        into_result(api_response, status.as_u16())
    }
}

/// Unwrap the Bot API envelope into its payload.
fn into_result<R>(response: ApiResponse<R>, status: u16) -> Result<R, TelegramError> {
    if !response.ok {
        return Err(TelegramError::Api {
            code: response.error_code.unwrap_or(i32::from(status)),
            description: response
                .description
                .unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    response.result.ok_or_else(|| TelegramError::Api {
        code: i32::from(status),
        description: "No result in response".to_string(),
    })
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result_ok() {
        let response: ApiResponse<bool> =
            serde_json::from_str(r#"{"ok":true,"result":true}"#).unwrap();
        assert!(into_result(response, 200).unwrap());
    }

    #[test]
    fn test_into_result_api_error() {
        let response: ApiResponse<bool> = serde_json::from_str(
            r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#,
        )
        .unwrap();
        match into_result(response, 403) {
            Err(TelegramError::Api { code, description }) => {
                assert_eq!(code, 403);
                assert!(description.contains("blocked"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_into_result_missing_result() {
        let response: ApiResponse<bool> = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(matches!(
            into_result(response, 200),
            Err(TelegramError::Api { .. })
        ));
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let result = TelegramClient::new(TelegramConfig::new("  "));
        assert!(matches!(result, Err(TelegramError::Config(_))));
    }
}

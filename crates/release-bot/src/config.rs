//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use database::sqlite_url_from_path;
use movie_catalog::CatalogConfig;
use telegram_client::TelegramConfig;

use crate::notifier::NotifierConfig;

/// Default region shown in the help text.
pub const DEFAULT_REGION: &str = "DE";

/// Default length of the release window in days.
pub const DEFAULT_NOTIFY_WINDOW_DAYS: i64 = 7;

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API connection.
    pub telegram: TelegramConfig,
    /// Movie catalog connection.
    pub catalog: CatalogConfig,
    /// Public base URL for the webhook. `None` means long polling.
    pub host: Option<String>,
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Region code shown in the help text.
    pub region: String,
    /// Release window length in days.
    pub notify_window_days: i64,
    /// Whether notifier passes delete finished, past releases.
    pub prune_expired: bool,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TELEGRAM_BOT_KEY` | Bot token | (required) |
    /// | `TELEGRAM_API_URL` | Bot API base URL | `https://api.telegram.org` |
    /// | `THEMOVIEDB_API_KEY` | TMDb API key | (required) |
    /// | `THEMOVIEDB_API_URL` | TMDb API base URL | `https://api.themoviedb.org/3` |
    /// | `HOST` | Public webhook base URL | (unset: long polling) |
    /// | `PORT` | HTTP port | `8080` |
    /// | `SQLITE_PATH` | SQLite path or URL | `./data/releases.db` |
    /// | `RELEASE_REGION` | Region code | `DE` |
    /// | `NOTIFY_WINDOW_DAYS` | Release window in days | `7` |
    /// | `PRUNE_EXPIRED_RELEASES` | Prune finished releases | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("TELEGRAM_BOT_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_KEY"))?;
        let telegram = match lookup("TELEGRAM_API_URL") {
            Some(url) => TelegramConfig::with_api_url(url, token),
            None => TelegramConfig::new(token),
        };

        let api_key = lookup("THEMOVIEDB_API_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("THEMOVIEDB_API_KEY"))?;
        let mut catalog = CatalogConfig::new(api_key);
        if let Some(url) = lookup("THEMOVIEDB_API_URL") {
            catalog = catalog.with_api_url(url);
        }

        let host = lookup("HOST").filter(|v| !v.trim().is_empty());

        let port = lookup("PORT").unwrap_or_else(|| "8080".to_string());
        let port: u16 = port.parse().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port.clone(),
        })?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = sqlite_url_from_path(
            &lookup("SQLITE_PATH").unwrap_or_else(|| "./data/releases.db".to_string()),
        );

        let region = lookup("RELEASE_REGION")
            .map(|v| v.trim().to_uppercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let notify_window_days = match lookup("NOTIFY_WINDOW_DAYS") {
            Some(value) => match value.parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "NOTIFY_WINDOW_DAYS",
                        value,
                    })
                }
            },
            None => DEFAULT_NOTIFY_WINDOW_DAYS,
        };

        let prune_expired = lookup("PRUNE_EXPIRED_RELEASES")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            telegram,
            catalog,
            host,
            addr,
            database_url,
            region,
            notify_window_days,
            prune_expired,
        })
    }

    /// Notifier settings derived from this configuration.
    pub fn notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            window: chrono::Duration::days(self.notify_window_days),
            prune_expired: self.prune_expired,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

//! Release bot server.
//!
//! Serves the webhook and the notifier task endpoint, or long-polls the Bot
//! API when no public host is configured.

use std::path::Path;
use std::sync::Arc;

use database::{Database, SqliteReleaseStore};
use movie_catalog::MovieCatalog;
use release_bot::{
    routes, AppState, BotConfig, ConversationHandler, Notifier, UpdateProcessor,
};
use telegram_client::{poll_updates, PollConfig, TelegramClient};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Capacity of the queue between update sources and the processor.
const UPDATE_QUEUE_SIZE: usize = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = BotConfig::from_env()?;
    info!(addr = %config.addr, region = %config.region, "Starting release bot");

    // Connect to database
    create_database_dir(&config.database_url)?;
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    let store = Arc::new(SqliteReleaseStore::new(db.clone()));

    let catalog = Arc::new(MovieCatalog::new(config.catalog.clone())?);
    let client = TelegramClient::connect(config.telegram.clone()).await?;
    let sender = Arc::new(client.clone());

    let (tx, rx) = mpsc::channel(UPDATE_QUEUE_SIZE);

    // Pick the update source
    let poller = match config.host.as_deref() {
        Some(host) => {
            let url = config.telegram.webhook_url(host);
            client.set_webhook(&url).await?;
            info!(host = %host, "Webhook registered");

            let webhook = client.get_webhook_info().await?;
            if webhook.last_error_date != 0 {
                warn!(
                    "Telegram webhook callback failed: {}",
                    webhook.last_error_message.as_deref().unwrap_or("unknown error")
                );
            }
            None
        }
        None => {
            client.delete_webhook().await?;
            info!("No HOST configured, polling for updates");
            Some(tokio::spawn(poll_updates(
                client.clone(),
                tx.clone(),
                PollConfig::default(),
            )))
        }
    };

    let handler = ConversationHandler::new(catalog, store.clone(), config.region.clone());
    let processor = UpdateProcessor::new(handler, sender.clone());
    let processing = tokio::spawn(processor.run(rx));

    let notifier = Notifier::new(store, sender, config.notifier_config());
    let state = AppState::new(tx, notifier, &config.telegram.token);
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Release bot listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stopping the poller closes the queue; the processor drains it and exits.
    if let Some(poller) = poller {
        poller.abort();
    }
    if let Err(e) = processing.await {
        warn!("Update processor ended abnormally: {}", e);
    }

    db.close().await;
    info!("Release bot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Create the directory holding a file database.
fn create_database_dir(url: &str) -> std::io::Result<()> {
    let path = url.trim_start_matches("sqlite:").trim_start_matches("//");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }

    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

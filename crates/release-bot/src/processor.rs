//! Update processor that connects incoming updates to the conversation handler.

use std::sync::Arc;

use telegram_client::Update;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::BotError;
use crate::formatting::{Reply, APOLOGY};
use crate::handler::ConversationHandler;
use crate::sender::MessageSender;

/// Result of processing a single update.
#[derive(Debug)]
pub enum ProcessResult {
    /// Update was handled and a reply sent.
    Responded { chat_id: i64, response: String },
    /// Update was skipped (e.g., not a text message).
    Skipped { reason: String },
    /// Handling or replying failed.
    Error(BotError),
}

/// Processes updates one at a time and replies through a [`MessageSender`].
#[derive(Clone)]
pub struct UpdateProcessor {
    handler: ConversationHandler,
    sender: Arc<dyn MessageSender>,
}

impl UpdateProcessor {
    /// Create a new processor.
    pub fn new(handler: ConversationHandler, sender: Arc<dyn MessageSender>) -> Self {
        Self { handler, sender }
    }

    /// Process a single update and return the result.
    ///
    /// A handler failure is answered with an apology so the user is never
    /// left without a reply.
    pub async fn process_update(&self, update: &Update) -> ProcessResult {
        let Some((chat_id, text)) = update.text_message() else {
            debug!(update_id = update.update_id, "Skipping update without text");
            return ProcessResult::Skipped {
                reason: "no text message".to_string(),
            };
        };

        info!(chat_id, "Processing message: {}", text);

        let reply = match self.handler.handle(chat_id, text).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(chat_id, kind = ?e.kind(), "Failed to handle message: {}", e);
                if let Err(send_err) = self.sender.send_reply(chat_id, &Reply::plain(APOLOGY)).await
                {
                    warn!(chat_id, "Failed to send apology: {}", send_err);
                }
                return ProcessResult::Error(e);
            }
        };

        match self.sender.send_reply(chat_id, &reply).await {
            Ok(()) => ProcessResult::Responded {
                chat_id,
                response: reply.text,
            },
            Err(e) => {
                error!(chat_id, "Failed to send reply: {}", e);
                ProcessResult::Error(e)
            }
        }
    }

    /// Run the processor until every sender of `updates` is dropped.
    pub async fn run(self, mut updates: mpsc::Receiver<Update>) {
        info!("Starting update processor");

        while let Some(update) = updates.recv().await {
            self.log_result(self.process_update(&update).await);
        }

        info!("Update channel closed, stopping update processor");
    }

    fn log_result(&self, result: ProcessResult) {
        match result {
            ProcessResult::Responded { chat_id, response } => {
                debug!(chat_id, "Responded: {}", response);
            }
            ProcessResult::Skipped { reason } => {
                debug!("Skipped: {}", reason);
            }
            ProcessResult::Error(e) => {
                // Log but continue processing
                warn!("Error processing update: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{DatabaseError, MemoryReleaseStore, MovieRelease, ReleaseStore, SubscribeOutcome};
    use movie_catalog::{async_trait, CatalogError, MovieCandidate, MovieSearch};
    use telegram_client::{Chat, Message};

    use crate::formatting::Markup;
    use crate::sender::RecordingSender;

    struct EmptyCatalog;

    #[async_trait]
    impl MovieSearch for EmptyCatalog {
        async fn search(
            &self,
            _title: &str,
            _year: Option<u16>,
        ) -> Result<Vec<MovieCandidate>, CatalogError> {
            Ok(Vec::new())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ReleaseStore for BrokenStore {
        async fn upsert_subscription(
            &self,
            _snapshot: &MovieRelease,
            _chat_id: i64,
        ) -> database::Result<SubscribeOutcome> {
            Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound))
        }

        async fn list_all(&self) -> database::Result<Vec<MovieRelease>> {
            Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound))
        }

        async fn save_release(&self, _release: &MovieRelease) -> database::Result<()> {
            Ok(())
        }

        async fn prune_expired(&self, _before: chrono::NaiveDate) -> database::Result<u64> {
            Ok(0)
        }
    }

    fn update(chat_id: i64, text: Option<&str>) -> Update {
        Update {
            update_id: 1,
            message: Some(Message {
                message_id: 1,
                chat: Chat {
                    id: chat_id,
                    kind: "private".to_string(),
                    username: None,
                },
                text: text.map(str::to_string),
                ..Default::default()
            }),
        }
    }

    fn processor(store: Arc<dyn ReleaseStore>) -> (UpdateProcessor, RecordingSender) {
        let sender = RecordingSender::new();
        let handler = ConversationHandler::new(Arc::new(EmptyCatalog), store, "DE");
        (UpdateProcessor::new(handler, Arc::new(sender.clone())), sender)
    }

    #[tokio::test]
    async fn test_replies_to_text_message() {
        let (processor, sender) = processor(Arc::new(MemoryReleaseStore::new()));

        let result = processor.process_update(&update(5, Some("releases nope"))).await;

        match result {
            ProcessResult::Responded { chat_id, response } => {
                assert_eq!(chat_id, 5);
                assert_eq!(response, "No entry found 🤓");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(sender.texts_for(5), vec!["No entry found 🤓"]);
    }

    #[tokio::test]
    async fn test_help_is_sent_as_markdown() {
        let (processor, sender) = processor(Arc::new(MemoryReleaseStore::new()));

        processor.process_update(&update(5, Some("hello"))).await;

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].markup, Markup::Markdown);
    }

    #[tokio::test]
    async fn test_skips_updates_without_text() {
        let (processor, sender) = processor(Arc::new(MemoryReleaseStore::new()));

        let no_text = processor.process_update(&update(5, None)).await;
        let no_message = processor.process_update(&Update::default()).await;

        assert!(matches!(no_text, ProcessResult::Skipped { .. }));
        assert!(matches!(no_message, ProcessResult::Skipped { .. }));
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_handler_failure_sends_apology() {
        let (processor, sender) = processor(Arc::new(BrokenStore));

        let result = processor.process_update(&update(5, Some("list subscriptions"))).await;

        assert!(matches!(result, ProcessResult::Error(BotError::Store(_))));
        assert_eq!(sender.texts_for(5), vec![APOLOGY]);
    }

    #[tokio::test]
    async fn test_send_failure_is_reported() {
        let (processor, sender) = processor(Arc::new(MemoryReleaseStore::new()));
        sender.fail_for(5);

        let result = processor.process_update(&update(5, Some("releases nope"))).await;

        assert!(matches!(result, ProcessResult::Error(BotError::Send(_))));
    }

    #[tokio::test]
    async fn test_run_survives_errors_until_channel_closes() {
        let (processor, sender) = processor(Arc::new(BrokenStore));
        let (tx, rx) = mpsc::channel(8);

        tx.send(update(1, Some("list subscriptions"))).await.unwrap();
        tx.send(update(2, Some("releases nope"))).await.unwrap();
        drop(tx);

        processor.run(rx).await;

        assert_eq!(sender.texts_for(1), vec![APOLOGY]);
        assert_eq!(sender.texts_for(2), vec!["No entry found 🤓"]);
    }
}

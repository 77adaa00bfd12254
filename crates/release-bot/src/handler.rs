//! Conversation handler: turns a chat message into a reply.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use database::{MovieRelease, ReleaseStore, SubscribeOutcome};
use movie_catalog::{filter_exact, MovieSearch};
use tracing::info;

use crate::command::{parse_command, Command, ReleaseQuery};
use crate::error::Result;
use crate::formatting::{
    help_text, render_search_results, render_subscriptions, Reply, AMBIGUOUS_TITLE,
    NO_RELEASES_FOUND, SUBSCRIBED,
};

/// Routes parsed commands to the catalog and the subscription store.
#[derive(Clone)]
pub struct ConversationHandler {
    catalog: Arc<dyn MovieSearch>,
    store: Arc<dyn ReleaseStore>,
    region: String,
}

impl ConversationHandler {
    /// Create a handler. `region` is only shown in the help text.
    pub fn new(
        catalog: Arc<dyn MovieSearch>,
        store: Arc<dyn ReleaseStore>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            store,
            region: region.into(),
        }
    }

    /// Handle a message from `chat_id`.
    pub async fn handle(&self, chat_id: i64, text: &str) -> Result<Reply> {
        self.handle_at(chat_id, text, Utc::now()).await
    }

    /// Handle a message as if it arrived at `now`.
    pub async fn handle_at(&self, chat_id: i64, text: &str, now: DateTime<Utc>) -> Result<Reply> {
        match parse_command(text) {
            Some(Command::Releases(query)) | Some(Command::ReleasesInYear(query)) => {
                self.releases(&query).await
            }
            Some(Command::Subscribe { title }) => self.subscribe(chat_id, &title, now).await,
            Some(Command::ListSubscriptions) => self.list_subscriptions(chat_id).await,
            None => Ok(Reply::markdown(help_text(&self.region))),
        }
    }

    async fn releases(&self, query: &ReleaseQuery) -> Result<Reply> {
        let mut results = self.catalog.search(&query.title, query.year).await?;
        if query.exact {
            results = filter_exact(results, &query.title);
        }

        info!(
            "Release query '{}' (exact: {}, year: {:?}) -> {} results",
            query.title,
            query.exact,
            query.year,
            results.len()
        );
        Ok(Reply::plain(render_search_results(&results)))
    }

    async fn subscribe(&self, chat_id: i64, title: &str, now: DateTime<Utc>) -> Result<Reply> {
        let upcoming: Vec<MovieRelease> = self
            .catalog
            .search(title, None)
            .await?
            .into_iter()
            .filter(|candidate| candidate.is_upcoming(now))
            .filter_map(|candidate| {
                candidate
                    .release_date
                    .map(|date| MovieRelease::new(candidate.id, candidate.title, date))
            })
            .collect();

        let release = match upcoming.as_slice() {
            [] => return Ok(Reply::plain(NO_RELEASES_FOUND)),
            [release] => release,
            _ => {
                info!(chat_id, "Subscribe to '{}' matched {} releases", title, upcoming.len());
                return Ok(Reply::plain(AMBIGUOUS_TITLE));
            }
        };

        match self.store.upsert_subscription(release, chat_id).await? {
            SubscribeOutcome::Subscribed => {
                info!(chat_id, release_id = release.id, "Subscribed to '{}'", release.title)
            }
            SubscribeOutcome::AlreadySubscribed => {
                info!(chat_id, release_id = release.id, "Already subscribed to '{}'", release.title)
            }
        }

        Ok(Reply::plain(SUBSCRIBED))
    }

    async fn list_subscriptions(&self, chat_id: i64) -> Result<Reply> {
        let subscriptions: Vec<MovieRelease> = self
            .store
            .list_all()
            .await?
            .into_iter()
            .filter(|release| release.has_subscriber(chat_id))
            .collect();

        Ok(Reply::plain(render_subscriptions(&subscriptions)))
    }
}

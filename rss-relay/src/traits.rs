use crate::types::{ParsedFeed, Result};
use async_trait::async_trait;

/// Somewhere feeds come from. Production code fetches over HTTP; tests can
/// serve canned documents.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse the feed at `url`.
    async fn pull(&self, url: &str) -> Result<ParsedFeed>;
}

/// Destination for relayed articles.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Whether the bot can currently reach `channel_id`.
    async fn channel_exists(&self, channel_id: u64) -> Result<bool>;

    /// Post a plain message to `channel_id`.
    async fn send_message(&self, channel_id: u64, content: &str) -> Result<()>;
}

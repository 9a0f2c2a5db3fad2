use crate::traits::FeedSource;
use crate::types::{FetchConfig, ParsedFeed, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::info;

/// Feed source backed by a live HTTP fetch.
pub struct HttpFeedSource {
    fetcher: Fetcher,
}

impl HttpFeedSource {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn pull(&self, url: &str) -> Result<ParsedFeed> {
        let content = self.fetcher.fetch_feed(url).await?;
        let parsed = FeedParser::parse_feed(&content)?;

        info!(
            "Pulled {} entries from {} ({})",
            parsed.entries.len(),
            url,
            parsed.title.as_deref().unwrap_or("untitled feed")
        );
        Ok(parsed)
    }
}

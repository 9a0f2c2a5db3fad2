use crate::types::{FetchConfig, RelayError, Result};
use reqwest::Client;
use std::time::Instant;
use tracing::debug;

/// Downloads feed documents. One attempt per call; callers decide what a
/// failure means for the current pass.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RelayError::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await?;
        debug!(
            "Fetched feed: {} ({} bytes in {}ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }
}

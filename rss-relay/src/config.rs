use crate::types::{RelayError, Result};
use std::fmt;
use url::Url;

pub const BOT_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";
pub const CHANNEL_IDS_VAR: &str = "DISCORD_CHANNEL_IDS";
pub const FEED_URLS_VAR: &str = "RSS_FEED_URLS";

/// Validated startup configuration.
///
/// Built once in `main` and handed to the pieces that need it; nothing reads
/// the environment after this point.
#[derive(Clone)]
pub struct RelayConfig {
    pub bot_token: String,
    pub channel_ids: Vec<u64>,
    pub feed_urls: Vec<String>,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bot_token", &"***")
            .field("channel_ids", &self.channel_ids)
            .field("feed_urls", &self.feed_urls)
            .finish()
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Fails on the first value
    /// that is absent or malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = require(&lookup, BOT_TOKEN_VAR)?;
        let raw_channels = require(&lookup, CHANNEL_IDS_VAR)?;
        let raw_feeds = require(&lookup, FEED_URLS_VAR)?;

        let channel_ids = split_list(&raw_channels)
            .map(|item| {
                item.parse::<u64>().map_err(|_| RelayError::InvalidConfig {
                    name: CHANNEL_IDS_VAR.to_string(),
                    value: item.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let feed_urls = split_list(&raw_feeds)
            .map(|item| validate_feed_url(item).map(|_| item.to_string()))
            .collect::<Result<Vec<_>>>()?;

        if channel_ids.is_empty() {
            return Err(RelayError::MissingConfig { name: CHANNEL_IDS_VAR.to_string() });
        }
        if feed_urls.is_empty() {
            return Err(RelayError::MissingConfig { name: FEED_URLS_VAR.to_string() });
        }

        Ok(Self {
            bot_token: bot_token.trim().to_string(),
            channel_ids,
            feed_urls,
        })
    }
}

fn require<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| RelayError::MissingConfig { name: name.to_string() })
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn validate_feed_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw)?;
    if url.scheme() == "http" || url.scheme() == "https" {
        Ok(())
    } else {
        Err(RelayError::InvalidConfig {
            name: FEED_URLS_VAR.to_string(),
            value: raw.to_string(),
        })
    }
}

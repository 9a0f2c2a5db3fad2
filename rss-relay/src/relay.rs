use crate::rss_utils::html::{clean_html, extract_images};
use crate::state::StateStore;
use crate::traits::{ChatSink, FeedSource};
use crate::types::{FeedEntry, Result, DEFAULT_EMOJI};
use std::ops::AddAssign;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(600);

/// Outcome of polling every feed for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelReport {
    pub posted: usize,
    pub already_seen: usize,
    pub failed_feeds: usize,
    pub empty_feeds: usize,
    pub failed_posts: usize,
}

impl AddAssign for ChannelReport {
    fn add_assign(&mut self, other: Self) {
        self.posted += other.posted;
        self.already_seen += other.already_seen;
        self.failed_feeds += other.failed_feeds;
        self.empty_feeds += other.empty_feeds;
        self.failed_posts += other.failed_posts;
    }
}

/// Outcome of one pass over all channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub channels_polled: usize,
    pub channels_skipped: usize,
    pub totals: ChannelReport,
}

/// Relays the newest entry of each feed into chat channels, once per link
/// per channel.
pub struct RssRelay<C, F> {
    chat: C,
    feeds: F,
    store: StateStore,
    feed_urls: Vec<String>,
    emoji: String,
}

impl<C: ChatSink, F: FeedSource> RssRelay<C, F> {
    pub fn new(chat: C, feeds: F, store: StateStore, feed_urls: Vec<String>) -> Self {
        Self {
            chat,
            feeds,
            store,
            feed_urls,
            emoji: DEFAULT_EMOJI.to_string(),
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn chat(&self) -> &C {
        &self.chat
    }

    pub fn feeds(&self) -> &F {
        &self.feeds
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// One poll of every configured feed for `channel_id`.
    ///
    /// State is loaded once up front and saved once at the end. Only the
    /// newest entry of each feed is considered. Feed failures skip that feed;
    /// state IO failures are returned.
    pub async fn poll_channel(&self, channel_id: u64) -> Result<ChannelReport> {
        let mut sent = self.store.load().await?;
        sent.ensure_channel(channel_id);

        let mut report = ChannelReport::default();

        for url in &self.feed_urls {
            let feed = match self.feeds.pull(url).await {
                Ok(feed) => feed,
                Err(e) => {
                    warn!("RSS error for {}: {}", url, e);
                    report.failed_feeds += 1;
                    continue;
                }
            };

            let Some(entry) = feed.newest() else {
                debug!("Feed {} has no entries", url);
                report.empty_feeds += 1;
                continue;
            };

            if !sent.record(channel_id, &entry.link) {
                debug!("Already posted to {}: {}", channel_id, entry.link);
                report.already_seen += 1;
                continue;
            }

            if self.post_entry(channel_id, entry).await {
                report.posted += 1;
            } else {
                report.failed_posts += 1;
            }
        }

        self.store.save(&sent).await?;
        Ok(report)
    }

    // Returns whether the text message went out. Send failures are logged;
    // the link stays recorded either way.
    async fn post_entry(&self, channel_id: u64, entry: &FeedEntry) -> bool {
        let description = entry.description.as_deref().unwrap_or("");
        let message = compose_message(&self.emoji, &entry.title, &clean_html(description));

        if let Err(e) = self.chat.send_message(channel_id, &message).await {
            error!("Failed to post '{}' to channel {}: {}", entry.title, channel_id, e);
            return false;
        }

        // A bare image URL gets embedded by the client, so it goes on its own.
        if let Some(image) = extract_images(description).into_iter().next() {
            if let Err(e) = self.chat.send_message(channel_id, &image).await {
                error!("Failed to post image for '{}' to channel {}: {}", entry.title, channel_id, e);
            }
        }

        info!("Posted: {}", entry.title);
        if let Some(published_at) = entry.published_at {
            debug!("Posted {} (published {}) to channel {}", entry.link, published_at, channel_id);
        }
        true
    }

    /// Polls each channel in order. Unreachable channels are skipped.
    pub async fn run_pass(&self, channel_ids: &[u64]) -> Result<PassReport> {
        let mut pass = PassReport::default();

        for &channel_id in channel_ids {
            match self.chat.channel_exists(channel_id).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!("Channel {} not found or not accessible, skipping", channel_id);
                    pass.channels_skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!("Failed to look up channel {}: {}", channel_id, e);
                    pass.channels_skipped += 1;
                    continue;
                }
            }

            pass.totals += self.poll_channel(channel_id).await?;
            pass.channels_polled += 1;
        }

        info!(
            "Pass complete: {} channels polled, {} skipped, {} posted, {} posts failed, {} already seen, {} feeds failed",
            pass.channels_polled,
            pass.channels_skipped,
            pass.totals.posted,
            pass.totals.failed_posts,
            pass.totals.already_seen,
            pass.totals.failed_feeds
        );
        Ok(pass)
    }

    /// Runs a pass immediately, then sleeps `interval` after each finished
    /// pass. Only returns on a state IO error.
    pub async fn run(&self, channel_ids: &[u64], interval: Duration) -> Result<()> {
        loop {
            self.run_pass(channel_ids).await?;
            debug!("Sleeping {:?} until next pass", interval);
            tokio::time::sleep(interval).await;
        }
    }
}

/// `<emoji> **<title>**`, followed by the body on the next line when there is one.
pub fn compose_message(emoji: &str, title: &str, body: &str) -> String {
    let mut message = format!("{} **{}**", emoji, title);
    if !body.is_empty() {
        message.push('\n');
        message.push_str(body);
    }
    message
}

pub mod types;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod rss_utils;
pub mod state;
pub mod traits;
pub mod sources;
pub mod discord;
pub mod relay;

pub use types::*;
pub use config::RelayConfig;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use state::{SentArticles, StateStore};
pub use traits::{ChatSink, FeedSource};
pub use sources::HttpFeedSource;
pub use discord::DiscordClient;
pub use relay::{ChannelReport, PassReport, RssRelay};

use chrono::{DateTime, Utc};

/// Client identifier sent with every feed request.
pub const FEED_USER_AGENT: &str = "Mozilla/5.0 (compatible; DiscordRSSBot/1.0)";

/// Prefix placed in front of every posted headline.
pub const DEFAULT_EMOJI: &str = "📰";

/// One syndicated item, as far as the relay cares about it.
///
/// `link` is the identity of the entry: it is what gets recorded per channel
/// once the entry has been posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
}

impl ParsedFeed {
    /// First entry in document order, which feeds conventionally use for the newest item.
    pub fn newest(&self) -> Option<&FeedEntry> {
        self.entries.first()
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: FEED_USER_AGENT.to_string(),
            max_redirects: 10,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed fetch failed for {url}: HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{name} is missing")]
    MissingConfig { name: String },

    #[error("Invalid value for {name}: {value}")]
    InvalidConfig { name: String, value: String },

    #[error("Discord API error ({status}): {body}")]
    Discord { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, RelayError>;

use crate::types::{FeedEntry, ParsedFeed, RelayError, Result};
use feed_rs::parser;
use tracing::debug;

pub struct FeedParser;

impl FeedParser {
    /// Parses an RSS, Atom or JSON Feed document. Entry order is preserved.
    pub fn parse_feed(content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| RelayError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let entries: Vec<FeedEntry> = feed.entries.into_iter().filter_map(Self::parse_entry).collect();

        debug!("Parsed feed with {} entries", entries.len());

        Ok(ParsedFeed { title, entries })
    }

    // Entries without a link have no dedup key and are dropped.
    fn parse_entry(entry: feed_rs::model::Entry) -> Option<FeedEntry> {
        let link = Self::primary_link(&entry.links)?;
        let title = entry
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| "Untitled".to_string());

        let description = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body));

        Some(FeedEntry {
            title,
            link,
            description,
            published_at: entry.published.or(entry.updated),
        })
    }

    // The article itself is the `alternate` link (or one without `rel`);
    // `replies`, `related` or `enclosure` links may be shared across entries.
    fn primary_link(links: &[feed_rs::model::Link]) -> Option<String> {
        links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| links.first())
            .map(|l| l.href.clone())
    }
}

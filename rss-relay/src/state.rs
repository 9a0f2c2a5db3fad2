use crate::types::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_STATE_FILE: &str = "sent_articles.json";

/// Links already posted, keyed by channel id.
///
/// Each channel's list keeps insertion order. A link in a channel's list is
/// never posted to that channel again; other channels are unaffected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentArticles(BTreeMap<u64, Vec<String>>);

impl SentArticles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure `channel_id` has a (possibly empty) list.
    pub fn ensure_channel(&mut self, channel_id: u64) {
        self.0.entry(channel_id).or_default();
    }

    pub fn contains(&self, channel_id: u64, link: &str) -> bool {
        self.0
            .get(&channel_id)
            .is_some_and(|links| links.iter().any(|l| l == link))
    }

    /// Records `link` for `channel_id`. Returns `false` if it was already there.
    pub fn record(&mut self, channel_id: u64, link: &str) -> bool {
        let links = self.0.entry(channel_id).or_default();
        if links.iter().any(|l| l == link) {
            return false;
        }
        links.push(link.to_string());
        true
    }

    pub fn links(&self, channel_id: u64) -> Option<&[String]> {
        self.0.get(&channel_id).map(Vec::as_slice)
    }

    pub fn channels(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<u64, Vec<String>>> for SentArticles {
    fn from(map: BTreeMap<u64, Vec<String>>) -> Self {
        Self(map)
    }
}

/// Flat-file persistence for [`SentArticles`].
///
/// The whole mapping is read at the start of a channel poll and written back
/// in full at its end. There is no locking; one poll at a time is assumed.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file, a blank file or a `null` document all load as empty.
    pub async fn load(&self) -> Result<SentArticles> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("State file {} not found, starting empty", self.path.display());
                return Ok(SentArticles::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(SentArticles::new());
        }

        let parsed: Option<SentArticles> = serde_json::from_str(&content)?;
        Ok(parsed.unwrap_or_default())
    }

    /// Overwrites the file with the full mapping.
    pub async fn save(&self, sent: &SentArticles) -> Result<()> {
        let mut content = serde_json::to_string_pretty(sent)?;
        content.push('\n');
        tokio::fs::write(&self.path, content).await?;
        debug!("Saved state for {} channels to {}", sent.0.len(), self.path.display());
        Ok(())
    }
}

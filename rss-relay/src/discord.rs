//! Minimal Discord REST client.
//!
//! Only the three calls the relay needs: identify the bot, look up a channel
//! and post a message. No gateway connection is opened.

use crate::rss_utils::text::truncate_chars;
use crate::traits::ChatSink;
use crate::types::{RelayError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Discord rejects message content longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/discord-rss-relay, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
}

pub struct DiscordClient {
    client: Client,
    bot_token: String,
    api_base: String,
}

impl DiscordClient {
    pub fn new(bot_token: impl Into<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, bot_token))
    }

    pub fn with_client(client: Client, bot_token: impl Into<String>) -> Self {
        Self {
            client,
            bot_token: bot_token.into(),
            api_base: DISCORD_API_BASE.to_string(),
        }
    }

    /// Points the client at another API root, e.g. a local mock server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Bot {}", self.bot_token))
    }

    /// The bot account behind the token. Fails if the token is rejected.
    pub async fn current_user(&self) -> Result<DiscordUser> {
        let url = format!("{}/users/@me", self.api_base);
        let resp = self.authorized(self.client.get(&url)).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    /// `Ok(false)` when the channel does not exist or the bot cannot see it.
    pub async fn get_channel(&self, channel_id: u64) -> Result<bool> {
        let url = format!("{}/channels/{}", self.api_base, channel_id);
        let resp = self.authorized(self.client.get(&url)).send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => {
                debug!("Channel {} not accessible ({})", channel_id, resp.status());
                Ok(false)
            }
            _ => check_status(resp).await.map(|_| true),
        }
    }

    pub async fn send_message(&self, channel_id: u64, content: &str) -> Result<()> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let content = truncate_chars(content, MAX_MESSAGE_CHARS);

        let resp = self
            .authorized(self.client.post(&url))
            .json(&json!({ "content": content }))
            .send()
            .await?;
        check_status(resp).await?;

        debug!("Sent message to channel {}", channel_id);
        Ok(())
    }
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(RelayError::Discord {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ChatSink for DiscordClient {
    async fn channel_exists(&self, channel_id: u64) -> Result<bool> {
        self.get_channel(channel_id).await
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<()> {
        DiscordClient::send_message(self, channel_id, content).await
    }
}

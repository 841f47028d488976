//! Discord thread adapter.
//!
//! Implements the Thread trait over the Discord REST API: posting replies and
//! notices, closing a thread once its context is exhausted, and reading the
//! thread history the relay turns into a prompt.

use async_trait::async_trait;
use serde::Deserialize;
use threadgpt_config::DiscordConfig;
use threadgpt_core::channel::{Embed, EmbedColor, OutgoingContent, SentMessage, Thread, ThreadId};
use threadgpt_core::error::ChannelError;
use threadgpt_core::message::Message;
use tracing::{debug, info};

/// Prefix marking a thread the bot no longer answers in.
pub const INACTIVATE_THREAD_PREFIX: &str = "[💤]";

/// Discord caps thread names at 100 characters.
const MAX_THREAD_NAME_CHARS: usize = 100;

/// A single Discord thread, addressed through the REST API.
pub struct DiscordThread {
    thread_id: ThreadId,
    api_url: String,
    bot_token: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for DiscordThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordThread")
            .field("thread_id", &self.thread_id)
            .field("api_url", &self.api_url)
            .field("bot_token", &"[REDACTED]")
            .finish()
    }
}

impl DiscordThread {
    pub fn new(
        thread_id: impl Into<String>,
        api_url: impl Into<String>,
        bot_token: impl Into<String>,
    ) -> Self {
        Self {
            thread_id: ThreadId(thread_id.into()),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a handle from configuration; fails without a bot token.
    pub fn from_config(
        config: &DiscordConfig,
        thread_id: impl Into<String>,
    ) -> Result<Self, ChannelError> {
        let token = config
            .bot_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ChannelError::NotConfigured("discord.bot_token is not set".into()))?;
        Ok(Self::new(thread_id, &config.api_url, token))
    }

    fn channel_url(&self) -> String {
        format!("{}/channels/{}", self.api_url, self.thread_id)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bot {}", self.bot_token))
    }

    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ChannelError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionLost(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::DeliveryFailed {
                channel: "discord".into(),
                reason: format!("{status}: {body}"),
            });
        }
        Ok(response)
    }

    async fn json<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T, ChannelError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ChannelError::InvalidPayload(e.to_string()))
    }

    /// The bot's own user ID.
    pub async fn current_user_id(&self) -> Result<String, ChannelError> {
        let url = format!("{}/users/@me", self.api_url);
        let response = self.execute(self.request(reqwest::Method::GET, &url)).await?;
        let user: DiscordUser = Self::json(response).await?;
        Ok(user.id)
    }

    /// Fetch up to `limit` recent messages, oldest first, as conversation history.
    pub async fn fetch_history(&self, limit: u32) -> Result<Vec<Message>, ChannelError> {
        let bot_id = self.current_user_id().await?;
        let url = format!("{}/messages", self.channel_url());
        let response = self
            .execute(
                self.request(reqwest::Method::GET, &url)
                    .query(&[("limit", limit.to_string())]),
            )
            .await?;
        let raw: Vec<DiscordMessage> = Self::json(response).await?;
        debug!(thread = %self.thread_id, fetched = raw.len(), "Fetched thread history");
        Ok(history_to_messages(raw, &bot_id))
    }

    async fn rename_inactive(&self) -> Result<(), ChannelError> {
        let response = self
            .execute(self.request(reqwest::Method::GET, &self.channel_url()))
            .await?;
        let channel: DiscordChannelInfo = Self::json(response).await?;
        let current = channel.name.unwrap_or_default();
        if current.starts_with(INACTIVATE_THREAD_PREFIX) {
            return Ok(());
        }

        let name: String = format!("{INACTIVATE_THREAD_PREFIX} {current}")
            .trim_end()
            .chars()
            .take(MAX_THREAD_NAME_CHARS)
            .collect();
        self.execute(
            self.request(reqwest::Method::PATCH, &self.channel_url())
                .json(&serde_json::json!({ "name": name })),
        )
        .await?;
        Ok(())
    }
}

/// Convert raw (newest-first) Discord messages into oldest-first history.
///
/// Messages from the bot itself become assistant turns; embed-only messages
/// (notices) carry no text and are dropped.
pub fn history_to_messages(raw: Vec<DiscordMessage>, bot_user_id: &str) -> Vec<Message> {
    raw.into_iter()
        .rev()
        .filter(|m| !m.content.trim().is_empty())
        .map(|m| {
            if m.author.id == bot_user_id {
                Message::assistant(m.content)
            } else {
                Message::user(m.content)
            }
        })
        .collect()
}

fn message_body(content: &OutgoingContent) -> serde_json::Value {
    match content {
        OutgoingContent::Text { content } => serde_json::json!({ "content": content }),
        OutgoingContent::Embed { embed } => serde_json::json!({
            "embeds": [{ "description": embed.description, "color": embed.color.rgb() }],
        }),
    }
}

#[async_trait]
impl Thread for DiscordThread {
    fn id(&self) -> &ThreadId {
        &self.thread_id
    }

    async fn send(&self, content: OutgoingContent) -> Result<SentMessage, ChannelError> {
        let url = format!("{}/messages", self.channel_url());
        let response = self
            .execute(
                self.request(reqwest::Method::POST, &url)
                    .json(&message_body(&content)),
            )
            .await?;
        let created: DiscordMessageRef = Self::json(response).await?;
        debug!(thread = %self.thread_id, message_id = %created.id, "Discord send");
        Ok(SentMessage { id: created.id })
    }

    async fn close_thread(&self) -> Result<(), ChannelError> {
        info!(thread = %self.thread_id, "Closing Discord thread");
        self.rename_inactive().await?;
        self.send(OutgoingContent::embed(Embed {
            description: "**Thread closed** - Context limit reached, closing...".into(),
            color: EmbedColor::Blue,
        }))
        .await?;
        self.execute(
            self.request(reqwest::Method::PATCH, &self.channel_url())
                .json(&serde_json::json!({ "archived": true, "locked": true })),
        )
        .await?;
        Ok(())
    }
}

// --- Discord API types ---

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordMessage {
    pub id: String,
    #[serde(default)]
    pub content: String,
    pub author: DiscordUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Deserialize)]
struct DiscordMessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DiscordChannelInfo {
    #[serde(default)]
    name: Option<String>,
}

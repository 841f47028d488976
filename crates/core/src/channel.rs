//! Thread trait — the abstraction over a chat-platform conversation.
//!
//! A Thread is where a relay run renders its result: plain text replies,
//! embed notices for failures, or closing the thread once the conversation
//! no longer fits the model's context window.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ChannelError;

/// Platform identifier of a thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Embed accent colors, as Discord RGB values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedColor {
    Yellow,
    Blue,
    Red,
    Green,
}

impl EmbedColor {
    pub fn rgb(&self) -> u32 {
        match self {
            EmbedColor::Yellow => 0xFEE75C,
            EmbedColor::Blue => 0x3498DB,
            EmbedColor::Red => 0xED4245,
            EmbedColor::Green => 0x57F287,
        }
    }
}

/// A styled notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub description: String,
    pub color: EmbedColor,
}

impl Embed {
    /// A yellow warning notice.
    pub fn warning(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            color: EmbedColor::Yellow,
        }
    }
}

/// What can be sent into a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutgoingContent {
    Text { content: String },
    Embed { embed: Embed },
}

impl OutgoingContent {
    pub fn text(content: impl Into<String>) -> Self {
        OutgoingContent::Text {
            content: content.into(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        OutgoingContent::Embed { embed }
    }
}

/// Receipt for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    /// Platform message ID
    pub id: String,
}

/// The core Thread trait.
///
/// Implementations handle platform-specific delivery. Errors from `send` and
/// `close_thread` are returned to the caller untouched.
#[async_trait]
pub trait Thread: Send + Sync {
    /// Platform ID of this thread.
    fn id(&self) -> &ThreadId;

    /// Post a message into the thread.
    async fn send(&self, content: OutgoingContent) -> std::result::Result<SentMessage, ChannelError>;

    /// Archive the conversation; nothing more will be relayed into it.
    async fn close_thread(&self) -> std::result::Result<(), ChannelError>;
}

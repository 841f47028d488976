//! Provider trait — the abstraction over the chat-completion API.
//!
//! A Provider knows how to send rendered messages to an LLM and hand back the
//! raw completion. Classifying failures is the relay's job, not the provider's.
//!
//! Implementations: OpenAI and any OpenAI-compatible endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;
use crate::message::WireMessage;

/// A chat completion as returned by the API.
///
/// The nested fields are optional so a structurally broken response still
/// deserializes and can be reported as [`ProviderError::MalformedResponse`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Which model actually responded (may differ from requested)
    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChoiceMessage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ChatCompletion {
    /// Build a single-choice completion carrying `content`.
    pub fn with_content(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            choices: vec![Choice {
                message: Some(ChoiceMessage {
                    role: Some("assistant".into()),
                    content: Some(content.into()),
                }),
                finish_reason: Some("stop".into()),
            }],
            usage: None,
        }
    }

    /// Content of the first choice's message.
    pub fn first_content(&self) -> std::result::Result<&str, ProviderError> {
        let choice = self
            .choices
            .first()
            .ok_or_else(|| ProviderError::MalformedResponse("No choices in response".into()))?;
        let message = choice.message.as_ref().ok_or_else(|| {
            ProviderError::MalformedResponse("First choice has no message".into())
        })?;
        message.content.as_deref().ok_or_else(|| {
            ProviderError::MalformedResponse("First choice message has no content".into())
        })
    }
}

/// The core Provider trait.
///
/// The relay calls `create_chat_completion()` without knowing which backend
/// is behind it.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Request a completion of `messages` from `model`.
    async fn create_chat_completion(
        &self,
        model: &str,
        messages: &[WireMessage],
    ) -> std::result::Result<ChatCompletion, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

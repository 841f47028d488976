//! CompletionInvoker — one call to the completion API, classified.
//!
//! The invoker never fails: whatever the provider returns becomes a
//! [`CompletionOutcome`]. The renderer decides what each outcome means for the
//! thread, so the invoker knows nothing about the chat platform.

use std::sync::Arc;
use threadgpt_core::error::ProviderError;
use threadgpt_core::message::WireMessage;
use threadgpt_core::provider::Provider;
use tracing::{debug, error, info, warn};

use crate::outcome::CompletionOutcome;

/// Marker the API puts in its validation message when the prompt overflows.
pub const CONTEXT_LENGTH_MARKER: &str = "This model's maximum context length";

/// Calls the completion API and classifies the result.
#[derive(Clone)]
pub struct CompletionInvoker {
    provider: Arc<dyn Provider>,
}

impl CompletionInvoker {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Request a completion and map the result onto an outcome.
    pub async fn invoke(&self, messages: &[WireMessage], model: &str) -> CompletionOutcome {
        info!(
            provider = %self.provider.name(),
            model = %model,
            count = messages.len(),
            "Requesting completion"
        );
        debug!(messages = ?messages, "Completion prompt");

        let result = self
            .provider
            .create_chat_completion(model, messages)
            .await
            .and_then(|completion| completion.first_content().map(|c| c.trim().to_string()));

        match result {
            Ok(reply_text) => CompletionOutcome::Ok { reply_text },
            Err(err) => classify(err),
        }
    }
}

/// Map a provider failure onto the outcome taxonomy.
pub fn classify(err: ProviderError) -> CompletionOutcome {
    let status_text = err.to_string();
    match err.user_message() {
        Some(message) if message.contains(CONTEXT_LENGTH_MARKER) => {
            warn!(status = %status_text, "Prompt exceeds the model's context window");
            CompletionOutcome::TooLong { status_text }
        }
        Some(_) => {
            error!(error = ?err, "Completion request rejected");
            CompletionOutcome::InvalidRequest { status_text }
        }
        None => {
            error!(error = ?err, "Completion request failed");
            CompletionOutcome::OtherError { status_text }
        }
    }
}

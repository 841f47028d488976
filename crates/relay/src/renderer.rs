//! ResponseRenderer — turn a completion outcome into thread activity.

use threadgpt_channels::split::{MAX_CHARS_PER_REPLY_MSG, split_into_shorter_messages};
use threadgpt_core::channel::{Embed, OutgoingContent, Thread};
use threadgpt_core::error::ChannelError;
use tracing::debug;

use crate::outcome::CompletionOutcome;

/// Renders outcomes into a [`Thread`].
#[derive(Debug, Clone)]
pub struct ResponseRenderer {
    max_message_chars: usize,
}

impl Default for ResponseRenderer {
    fn default() -> Self {
        Self::new(MAX_CHARS_PER_REPLY_MSG)
    }
}

impl ResponseRenderer {
    pub fn new(max_message_chars: usize) -> Self {
        Self { max_message_chars }
    }

    /// Perform the one action `outcome` calls for.
    ///
    /// Send and close failures are returned as-is.
    pub async fn render(
        &self,
        thread: &dyn Thread,
        outcome: CompletionOutcome,
    ) -> Result<(), ChannelError> {
        debug!(thread = %thread.id(), outcome = outcome.kind(), "Rendering outcome");

        match outcome {
            CompletionOutcome::Ok { reply_text } if reply_text.is_empty() => {
                thread
                    .send(OutgoingContent::embed(Embed::warning(
                        "**Invalid response** - empty response",
                    )))
                    .await?;
            }
            CompletionOutcome::Ok { reply_text } => {
                // Sequential: chunk i must land before chunk i+1
                for chunk in split_into_shorter_messages(&reply_text, self.max_message_chars) {
                    thread.send(OutgoingContent::text(chunk)).await?;
                }
            }
            CompletionOutcome::TooLong { .. } => thread.close_thread().await?,
            CompletionOutcome::InvalidRequest { status_text } => {
                thread
                    .send(OutgoingContent::embed(Embed::warning(format!(
                        "**Invalid request** - {status_text}"
                    ))))
                    .await?;
            }
            CompletionOutcome::OtherError { status_text } => {
                thread
                    .send(OutgoingContent::embed(Embed::warning(format!(
                        "**Error** - {status_text}"
                    ))))
                    .await?;
            }
        }
        Ok(())
    }
}

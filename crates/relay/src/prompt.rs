//! PromptBuilder / Summarizer — shape thread history into a prompt.
//!
//! History is first windowed to the last `messages_to_summarize` turns. When
//! more than `messages_to_keep` remain, the older part is condensed by a
//! lightweight model into a single assistant turn placed before the recent
//! turns:
//!
//! ```text
//! [ dropped ... | older ............ | recent (keep) ]
//!                 └─ summarized ─┐
//!               [ assistant(summary) | recent (keep) ]
//! ```

use threadgpt_core::message::{Message, WireMessage, render_all};
use tracing::info;

use crate::invoker::CompletionInvoker;
use crate::outcome::CompletionOutcome;

/// Instruction appended to the older turns when asking for a summary.
pub const SUMMARY_INSTRUCTION: &str = "Provide a concise summary of the conversation so far";

/// How history gets compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeSettings {
    /// Model that writes the summary
    pub summary_model: String,
    /// Recent turns kept verbatim
    pub messages_to_keep: usize,
    /// Only this many trailing turns are considered at all
    pub messages_to_summarize: usize,
}

impl Default for SummarizeSettings {
    fn default() -> Self {
        Self {
            summary_model: "gpt-3.5-turbo".into(),
            messages_to_keep: 2,
            messages_to_summarize: 10,
        }
    }
}

/// What the prompt will look like before any API call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPlan {
    /// Send these messages as they are.
    Direct(Vec<Message>),
    /// Summarize `older`, then send the summary followed by `recent`.
    Summarize {
        older: Vec<Message>,
        recent: Vec<Message>,
    },
}

/// Window and partition `messages`. Pure; no I/O.
pub fn plan_prompt(messages: &[Message], keep: usize, window: usize) -> PromptPlan {
    let windowed = &messages[messages.len().saturating_sub(window)..];
    if windowed.len() <= keep {
        return PromptPlan::Direct(windowed.to_vec());
    }

    let (older, recent) = windowed.split_at(windowed.len() - keep);
    PromptPlan::Summarize {
        older: older.to_vec(),
        recent: recent.to_vec(),
    }
}

/// Builds prompts, summarizing older history through `invoker` when needed.
pub struct PromptBuilder<'a> {
    invoker: &'a CompletionInvoker,
    settings: &'a SummarizeSettings,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(invoker: &'a CompletionInvoker, settings: &'a SummarizeSettings) -> Self {
        Self { invoker, settings }
    }

    /// Build the rendered prompt for `messages`.
    ///
    /// `Err` carries the outcome of a failed summarization call; the caller
    /// should hand it straight to the renderer.
    pub async fn build(&self, messages: &[Message]) -> Result<Vec<WireMessage>, CompletionOutcome> {
        let plan = plan_prompt(
            messages,
            self.settings.messages_to_keep,
            self.settings.messages_to_summarize,
        );

        let (older, recent) = match plan {
            PromptPlan::Direct(messages) => return Ok(render_all(&messages)),
            PromptPlan::Summarize { older, recent } => (older, recent),
        };

        info!(
            older = older.len(),
            recent = recent.len(),
            model = %self.settings.summary_model,
            "Summarizing older history"
        );

        let summary = self.summarize(older).await?;

        let mut prompt = Vec::with_capacity(recent.len() + 1);
        prompt.push(Message::assistant(summary));
        prompt.extend(recent);
        Ok(render_all(&prompt))
    }

    async fn summarize(&self, mut older: Vec<Message>) -> Result<String, CompletionOutcome> {
        older.push(Message::user(SUMMARY_INSTRUCTION));
        match self
            .invoker
            .invoke(&render_all(&older), &self.settings.summary_model)
            .await
        {
            CompletionOutcome::Ok { reply_text } => Ok(reply_text),
            failed => Err(failed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::sync::Arc;
    use threadgpt_core::error::ProviderError;
    use threadgpt_core::message::Role;

    fn history(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("question {i}"))
                } else {
                    Message::assistant(format!("answer {i}"))
                }
            })
            .collect()
    }

    fn settings(keep: usize, window: usize) -> SummarizeSettings {
        SummarizeSettings {
            summary_model: "summary-model".into(),
            messages_to_keep: keep,
            messages_to_summarize: window,
        }
    }

    #[test]
    fn short_history_is_direct() {
        for n in 1..=4 {
            let messages = history(n);
            assert_eq!(plan_prompt(&messages, 4, 10), PromptPlan::Direct(messages));
        }
    }

    #[test]
    fn window_drops_oldest_silently() {
        let messages = history(8);
        assert_eq!(
            plan_prompt(&messages, 5, 3),
            PromptPlan::Direct(messages[5..].to_vec())
        );
    }

    #[test]
    fn zero_window_keeps_nothing() {
        assert_eq!(plan_prompt(&history(3), 2, 0), PromptPlan::Direct(vec![]));
    }

    #[test]
    fn partition_after_windowing() {
        let messages = history(12);
        match plan_prompt(&messages, 2, 10) {
            PromptPlan::Summarize { older, recent } => {
                assert_eq!(older, messages[2..10].to_vec());
                assert_eq!(recent, messages[10..].to_vec());
            }
            other => panic!("expected summarize plan, got {other:?}"),
        }
    }

    #[test]
    fn zero_keep_summarizes_everything() {
        let messages = history(3);
        assert_eq!(
            plan_prompt(&messages, 0, 10),
            PromptPlan::Summarize {
                older: messages.clone(),
                recent: vec![],
            }
        );
    }

    #[tokio::test]
    async fn no_summary_call_when_history_fits() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let invoker = CompletionInvoker::new(provider.clone());
        let settings = settings(3, 10);
        let messages = history(3);

        let prompt = PromptBuilder::new(&invoker, &settings)
            .build(&messages)
            .await
            .unwrap();
        assert_eq!(prompt, render_all(&messages));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn summary_replaces_older_turns() {
        let provider = Arc::new(ScriptedProvider::replies(&["  They discussed Rust.  "]));
        let invoker = CompletionInvoker::new(provider.clone());
        let settings = settings(2, 10);
        let messages = history(6);

        let prompt = PromptBuilder::new(&invoker, &settings)
            .build(&messages)
            .await
            .unwrap();

        assert_eq!(prompt.len(), 3);
        assert_eq!(prompt[0], Message::assistant("They discussed Rust.").render());
        assert_eq!(prompt[1..], render_all(&messages[4..]));

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let (model, sent) = &requests[0];
        assert_eq!(model, "summary-model");
        assert_eq!(sent.len(), 5);
        assert_eq!(sent[..4], render_all(&messages[..4]));
        assert_eq!(sent[4], Message::user(SUMMARY_INSTRUCTION).render());
    }

    #[tokio::test]
    async fn zero_keep_prompt_is_only_the_summary() {
        let invoker = CompletionInvoker::new(Arc::new(ScriptedProvider::replies(&["summary"])));
        let settings = settings(0, 10);

        let prompt = PromptBuilder::new(&invoker, &settings)
            .build(&history(4))
            .await
            .unwrap();
        assert_eq!(prompt.len(), 1);
        assert_eq!(prompt[0].role, Role::Assistant);
        assert_eq!(prompt[0].content, "summary");
    }

    #[tokio::test]
    async fn summarized_length_is_keep_plus_one() {
        for keep in 1..5 {
            let invoker = CompletionInvoker::new(Arc::new(ScriptedProvider::replies(&["s"])));
            let settings = settings(keep, 10);
            let prompt = PromptBuilder::new(&invoker, &settings)
                .build(&history(9))
                .await
                .unwrap();
            assert_eq!(prompt.len(), keep + 1);
        }
    }

    #[tokio::test]
    async fn summary_failure_short_circuits() {
        let provider = Arc::new(ScriptedProvider::failing(ProviderError::Network(
            "connection reset".into(),
        )));
        let invoker = CompletionInvoker::new(provider.clone());
        let settings = settings(1, 10);

        let outcome = PromptBuilder::new(&invoker, &settings)
            .build(&history(4))
            .await
            .unwrap_err();
        assert_eq!(outcome.kind(), "other_error");
        assert_eq!(provider.call_count(), 1);
    }
}

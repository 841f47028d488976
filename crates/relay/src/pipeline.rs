//! Relay — history in, thread activity out.
//!
//! ```text
//! messages ─▶ PromptBuilder ─▶ CompletionInvoker ─▶ CompletionOutcome ─▶ ResponseRenderer ─▶ thread
//!                  │ (summary call fails)                  ▲
//!                  └───────────────────────────────────────┘
//! ```

use std::sync::Arc;
use threadgpt_config::AppConfig;
use threadgpt_core::channel::Thread;
use threadgpt_core::error::ChannelError;
use threadgpt_core::message::{Message, render_all};
use threadgpt_core::provider::Provider;
use tracing::info;

use crate::invoker::CompletionInvoker;
use crate::outcome::CompletionOutcome;
use crate::prompt::{PromptBuilder, SummarizeSettings};
use crate::renderer::ResponseRenderer;

/// Which model answers and whether history is summarized first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    pub model: String,
    pub summarize: Option<SummarizeSettings>,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".into(),
            summarize: None,
        }
    }
}

impl RelaySettings {
    /// Settings described by the configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let summarize = &config.summarize;
        if summarize.enabled {
            Self {
                model: summarize.model.clone(),
                summarize: Some(SummarizeSettings {
                    summary_model: summarize.summary_model.clone(),
                    messages_to_keep: summarize.messages_to_keep,
                    messages_to_summarize: summarize.messages_to_summarize,
                }),
            }
        } else {
            Self {
                model: config.default_model.clone(),
                summarize: None,
            }
        }
    }

    /// Turn summarization on (defaults: `gpt-4`, keep 2, window 10) unless it already is.
    pub fn summarized(self) -> Self {
        if self.summarize.is_some() {
            return self;
        }
        Self {
            model: "gpt-4".into(),
            summarize: Some(SummarizeSettings::default()),
        }
    }
}

/// The complete completion-response pipeline.
pub struct Relay {
    invoker: CompletionInvoker,
    renderer: ResponseRenderer,
    settings: RelaySettings,
}

impl Relay {
    pub fn new(provider: Arc<dyn Provider>, settings: RelaySettings) -> Self {
        Self {
            invoker: CompletionInvoker::new(provider),
            renderer: ResponseRenderer::default(),
            settings,
        }
    }

    pub fn from_config(config: &AppConfig, provider: Arc<dyn Provider>) -> Self {
        Self::new(provider, RelaySettings::from_config(config))
            .with_renderer(ResponseRenderer::new(config.discord.max_message_chars))
    }

    pub fn with_renderer(mut self, renderer: ResponseRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Complete the full history as-is.
    pub async fn complete(&self, messages: &[Message]) -> CompletionOutcome {
        self.invoker
            .invoke(&render_all(messages), &self.settings.model)
            .await
    }

    /// Complete after windowing and summarizing older history.
    pub async fn complete_summarized(
        &self,
        messages: &[Message],
        summarize: &SummarizeSettings,
    ) -> CompletionOutcome {
        let prompt = match PromptBuilder::new(&self.invoker, summarize)
            .build(messages)
            .await
        {
            Ok(prompt) => prompt,
            Err(summary_failure) => return summary_failure,
        };
        self.invoker.invoke(&prompt, &self.settings.model).await
    }

    /// Complete using whichever variant the settings select.
    pub async fn generate(&self, messages: &[Message]) -> CompletionOutcome {
        match &self.settings.summarize {
            Some(summarize) => self.complete_summarized(messages, summarize).await,
            None => self.complete(messages).await,
        }
    }

    /// Generate a reply for `messages` and render it into `thread`.
    pub async fn respond(&self, thread: &dyn Thread, messages: &[Message]) -> Result<(), ChannelError> {
        let outcome = self.generate(messages).await;
        info!(thread = %thread.id(), outcome = outcome.kind(), "Relay run finished");
        self.renderer.render(thread, outcome).await
    }

    /// Render an outcome the caller already has.
    pub async fn render(&self, thread: &dyn Thread, outcome: CompletionOutcome) -> Result<(), ChannelError> {
        self.renderer.render(thread, outcome).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::SUMMARY_INSTRUCTION;
    use crate::test_helpers::*;
    use threadgpt_core::channel::{Embed, OutgoingContent};
    use threadgpt_core::error::ProviderError;

    fn conversation() -> Vec<Message> {
        vec![
            Message::user("What is Rust?"),
            Message::assistant("A systems language."),
            Message::user("Is it fast?"),
            Message::assistant("Yes."),
            Message::user("Show me an example"),
        ]
    }

    #[test]
    fn settings_from_config() {
        let mut config = AppConfig::default();
        assert_eq!(RelaySettings::from_config(&config), RelaySettings::default());

        config.summarize.enabled = true;
        config.summarize.messages_to_keep = 4;
        let settings = RelaySettings::from_config(&config);
        assert_eq!(settings.model, "gpt-4");
        assert_eq!(settings.summarize.unwrap().messages_to_keep, 4);
    }

    #[test]
    fn summarized_defaults() {
        let settings = RelaySettings::default().summarized();
        assert_eq!(settings.model, "gpt-4");
        assert_eq!(settings.summarize, Some(SummarizeSettings::default()));
    }

    #[tokio::test]
    async fn plain_relay_sends_full_history() {
        let provider = Arc::new(ScriptedProvider::replies(&["fn main() {}"]));
        let relay = Relay::new(provider.clone(), RelaySettings::default());
        let thread = RecordingThread::new();

        relay.respond(&thread, &conversation()).await.unwrap();

        assert_eq!(thread.texts(), vec!["fn main() {}"]);
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "gpt-3.5-turbo");
        assert_eq!(requests[0].1, render_all(&conversation()));
    }

    #[tokio::test]
    async fn summarized_relay_makes_two_calls_in_order() {
        let provider = Arc::new(ScriptedProvider::replies(&["Talked about Rust speed.", "Here you go"]));
        let relay = Relay::new(provider.clone(), RelaySettings::default().summarized());
        let thread = RecordingThread::new();

        relay.respond(&thread, &conversation()).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);

        let (summary_model, summary_prompt) = &requests[0];
        assert_eq!(summary_model, "gpt-3.5-turbo");
        assert_eq!(
            summary_prompt.last().unwrap().content,
            SUMMARY_INSTRUCTION
        );

        let (model, prompt) = &requests[1];
        assert_eq!(model, "gpt-4");
        assert_eq!(prompt.len(), 3);
        assert_eq!(prompt[0].content, "Talked about Rust speed.");
        assert_eq!(prompt[2].content, "Show me an example");

        assert_eq!(thread.texts(), vec!["Here you go"]);
    }

    #[tokio::test]
    async fn summary_failure_is_rendered_and_main_call_skipped() {
        let provider = Arc::new(ScriptedProvider::failing(invalid_request(CONTEXT_OVERFLOW)));
        let relay = Relay::new(provider.clone(), RelaySettings::default().summarized());
        let thread = RecordingThread::new();

        relay.respond(&thread, &conversation()).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(thread.events(), vec![ThreadEvent::Closed]);
    }

    #[tokio::test]
    async fn validation_error_is_reported() {
        let provider = Arc::new(ScriptedProvider::failing(invalid_request(
            "Invalid value for 'temperature'",
        )));
        let relay = Relay::new(provider, RelaySettings::default());
        let thread = RecordingThread::new();

        relay.respond(&thread, &conversation()).await.unwrap();

        assert_eq!(
            thread.events(),
            vec![ThreadEvent::Sent(OutgoingContent::embed(Embed::warning(
                "**Invalid request** - Invalid value for 'temperature'"
            )))]
        );
    }

    #[tokio::test]
    async fn network_error_is_reported() {
        let provider = Arc::new(ScriptedProvider::failing(ProviderError::Timeout(
            "operation timed out".into(),
        )));
        let relay = Relay::new(provider, RelaySettings::default());
        let thread = RecordingThread::new();

        relay.respond(&thread, &conversation()).await.unwrap();

        let events = thread.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            ThreadEvent::Sent(OutgoingContent::Embed { embed }) => {
                assert!(embed.description.starts_with("**Error** - "));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn renderer_errors_reach_the_caller() {
        let relay = Relay::new(
            Arc::new(ScriptedProvider::replies(&["hi"])),
            RelaySettings::default(),
        );
        assert!(relay.respond(&RecordingThread::broken(), &conversation()).await.is_err());
    }

    #[tokio::test]
    async fn configured_chunk_size_is_used() {
        let mut config = AppConfig::default();
        config.discord.max_message_chars = 10;
        let relay = Relay::from_config(&config, Arc::new(ScriptedProvider::replies(&["0123456789abcde"])));
        let thread = RecordingThread::new();

        relay.respond(&thread, &conversation()).await.unwrap();
        assert_eq!(thread.texts(), vec!["0123456789", "abcde"]);
    }
}

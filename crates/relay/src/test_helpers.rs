//! Shared test doubles for the relay pipeline.

use std::collections::VecDeque;
use std::sync::Mutex;
use threadgpt_core::channel::{OutgoingContent, SentMessage, Thread, ThreadId};
use threadgpt_core::error::{ChannelError, ProviderError};
use threadgpt_core::message::WireMessage;
use threadgpt_core::provider::{ChatCompletion, Provider};

pub const CONTEXT_OVERFLOW: &str = "This model's maximum context length is 4096 tokens. However, your messages resulted in 5123 tokens. Please reduce the length of the messages.";

/// A mock provider that returns a sequence of scripted results.
///
/// Each call to `create_chat_completion` pops the next result and records
/// the request. Panics if more calls are made than results provided.
pub struct ScriptedProvider {
    results: Mutex<VecDeque<Result<ChatCompletion, ProviderError>>>,
    requests: Mutex<Vec<(String, Vec<WireMessage>)>>,
}

impl ScriptedProvider {
    pub fn new(results: Vec<Result<ChatCompletion, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider answering every call, in order, with these texts.
    pub fn replies(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(reply(t))).collect())
    }

    pub fn failing(err: ProviderError) -> Self {
        Self::new(vec![Err(err)])
    }

    /// Every (model, messages) pair seen so far.
    pub fn requests(&self) -> Vec<(String, Vec<WireMessage>)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn create_chat_completion(
        &self,
        model: &str,
        messages: &[WireMessage],
    ) -> Result<ChatCompletion, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        let mut results = self.results.lock().unwrap();
        match results.pop_front() {
            Some(result) => result,
            None => panic!("ScriptedProvider: no more results"),
        }
    }
}

/// A single-choice completion carrying `text`.
pub fn reply(text: &str) -> ChatCompletion {
    ChatCompletion::with_content("mock-model", text)
}

pub fn invalid_request(user_message: &str) -> ProviderError {
    ProviderError::InvalidRequest {
        status_code: 400,
        user_message: user_message.into(),
    }
}

/// What a [`RecordingThread`] was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadEvent {
    Sent(OutgoingContent),
    Closed,
}

/// A thread that records sends and closes in order.
pub struct RecordingThread {
    id: ThreadId,
    events: Mutex<Vec<ThreadEvent>>,
    fail_sends: bool,
}

impl RecordingThread {
    pub fn new() -> Self {
        Self {
            id: ThreadId("test-thread".into()),
            events: Mutex::new(Vec::new()),
            fail_sends: false,
        }
    }

    /// A thread whose every send fails.
    pub fn broken() -> Self {
        Self {
            fail_sends: true,
            ..Self::new()
        }
    }

    pub fn events(&self) -> Vec<ThreadEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Text of every plain message sent, in order.
    pub fn texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ThreadEvent::Sent(OutgoingContent::Text { content }) => Some(content),
                _ => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl Thread for RecordingThread {
    fn id(&self) -> &ThreadId {
        &self.id
    }

    async fn send(&self, content: OutgoingContent) -> Result<SentMessage, ChannelError> {
        if self.fail_sends {
            return Err(ChannelError::DeliveryFailed {
                channel: "test".into(),
                reason: "send refused".into(),
            });
        }
        let mut events = self.events.lock().unwrap();
        events.push(ThreadEvent::Sent(content));
        Ok(SentMessage {
            id: events.len().to_string(),
        })
    }

    async fn close_thread(&self) -> Result<(), ChannelError> {
        self.events.lock().unwrap().push(ThreadEvent::Closed);
        Ok(())
    }
}

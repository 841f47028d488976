//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, Azure-style proxies, OpenRouter, Ollama, vLLM, and any
//! endpoint exposing `/v1/chat/completions`.
//!
//! HTTP failures are mapped onto [`ProviderError`] so the relay can tell a
//! rejected request (`InvalidRequest`) apart from everything else.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use threadgpt_config::AppConfig;
use threadgpt_core::error::ProviderError;
use threadgpt_core::message::WireMessage;
use threadgpt_core::provider::{ChatCompletion, Provider};
use tracing::{debug, warn};

/// Statuses the API uses for requests it refuses to process as sent.
const INVALID_REQUEST_STATUSES: [u16; 5] = [400, 404, 409, 413, 422];

/// An OpenAI-compatible chat-completion provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider with the default 120s timeout.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: build_client(Duration::from_secs(120)),
        }
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Replace the HTTP client with one using `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// Build the provider described by the configuration.
pub fn build_from_config(config: &AppConfig) -> OpenAiCompatProvider {
    let name = if config.api_url.contains("api.openai.com") {
        "openai"
    } else {
        "openai-compatible"
    };
    OpenAiCompatProvider::new(
        name,
        &config.api_url,
        config.api_key.clone().unwrap_or_default(),
    )
    .with_timeout(Duration::from_secs(config.request_timeout_secs))
}

/// Map a non-success HTTP response onto a provider error.
fn error_from_status(status: u16, retry_after: Option<u64>, body: &str) -> ProviderError {
    if status == 429 {
        return ProviderError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(5),
        };
    }

    if status == 401 || status == 403 {
        return ProviderError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        );
    }

    let api_error = serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error);
    let flagged_invalid = api_error
        .as_ref()
        .and_then(|e| e.r#type.as_deref())
        .is_some_and(|t| t == "invalid_request_error");

    if flagged_invalid || INVALID_REQUEST_STATUSES.contains(&status) {
        let user_message = api_error
            .and_then(|e| e.message)
            .unwrap_or_else(|| body.to_string());
        return ProviderError::InvalidRequest {
            status_code: status,
            user_message,
        };
    }

    ProviderError::ApiError {
        status_code: status,
        message: body.to_string(),
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_chat_completion(
        &self,
        model: &str,
        messages: &[WireMessage],
    ) -> std::result::Result<ChatCompletion, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        debug!(provider = %self.name, model = %model, count = messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(error_from_status(status, retry_after, &error_body));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        serde_json::from_str::<ChatCompletion>(&text)
            .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse response: {e}")))
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- OpenAI error body (internal) ---

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    r#type: Option<String>,
}

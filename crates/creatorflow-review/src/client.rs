//! HTTP client for OpenAI-compatible chat-completions APIs.
//!
//! Only the request/response subset the review adapter needs is modelled: a
//! model name plus a system and a user message in, the first choice's text out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

/// A language model that answers a system instruction plus user text with
/// free-form text.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ReviewError`] when the model cannot produce a completion.
    async fn complete(&self, system: &str, user: &str) -> Result<String, ReviewError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client.
///
/// Use [`OpenAiClient::new`] for the public API or
/// [`OpenAiClient::with_base_url`] to point at a compatible gateway or a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`ReviewError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ReviewError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ReviewError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ReviewError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ReviewError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("creatorflow/0.1 (content-review)")
            .build()?;

        // Exactly one trailing slash, so the join below appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("chat/completions"))
            .map_err(|_| ReviewError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ReviewError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ReviewError::EmptyCompletion)
    }
}

/// Stand-in used when no API key is configured. Every call fails with
/// [`ReviewError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredModel;

#[async_trait]
impl CompletionModel for UnconfiguredModel {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ReviewError> {
        Err(ReviewError::NotConfigured)
    }
}

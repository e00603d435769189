//! OpenAI-compatible chat completion client

use super::PatternProvider;
use crate::{Config, EasyRegexError, ProviderError, Result};
use serde::{Deserialize, Serialize};

/// Asks an OpenAI-compatible `/chat/completions` endpoint for patterns
pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a client from `config`; fails if no API key is configured
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("easy-regex/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Self::with_client(config, client)
    }

    /// Like [`OpenAiProvider::new`], but sends requests through `client`
    pub fn with_client(config: &Config, client: reqwest::Client) -> Result<Self> {
        let api_key = config.api_key().ok_or(EasyRegexError::MissingApiKey)?.to_string();

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url().trim_end_matches('/')),
            api_key,
            model: config.model().to_string(),
        })
    }

    /// The URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PatternProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "requesting chat completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body }.into());
        }

        let reply: ChatResponse = response.json().await?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::EmptyReply.into())
    }
}

//! The language-model capability boundary.
//!
//! [`Assistant`] is the seam between the pipeline and whatever engine does
//! structured extraction and summarization. The pipeline only ever sees raw
//! text replies; parsing and validation happen on the caller's side. This
//! keeps the aggregator decoupled from any specific backend and lets tests
//! drive the whole pipeline with deterministic doubles.
//!
//! [`OpenAiAssistant`] is the production implementation, speaking the
//! OpenAI-compatible chat-completions protocol.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ApiConfig;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("capability request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("capability returned an empty response")]
    EmptyResponse,
}

/// Structured-extraction and summarization capability.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Turn front-page content into a structured reply describing news
    /// entries. `base_url` is handed to the engine so it can resolve
    /// relative links. The reply is raw text expected to contain JSON.
    async fn extract(&self, content: &str, base_url: &str) -> Result<String, ApiError>;

    /// Produce a short prose summary of an article's plain text.
    async fn summarize(&self, content: &str) -> Result<String, ApiError>;
}

const EXTRACT_SYSTEM_PROMPT: &str = "You are a meticulous HTML parser. Find the news or research \
entries in the web page content and extract their information. Respond with valid JSON matching \
this exact schema:\n\
{\"news\": [{\"is_news\": bool, \"date\": \"string\", \"title\": \"string\", \"url\": \"string\"}]}\n\
Set is_news to true only for genuine news or research items. Extract the title, the date, and \
the absolute URL of each entry. If a link is relative, make it absolute by joining it with the \
base URL. Output only the raw JSON object, with no markdown fences or commentary.";

const SUMMARIZE_SYSTEM_PROMPT: &str = "Given the content of a news web page, summarize it to one \
paragraph with 2 to 3 sentences. Output only the summary.";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiAssistant {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiAssistant {
    pub fn new(config: &ApiConfig, api_key: String) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("newsbrief/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, ApiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: 0.2,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ApiError::EmptyResponse)?;

        debug!(bytes = content.len(), "Capability reply received");
        Ok(content)
    }
}

#[async_trait]
impl Assistant for OpenAiAssistant {
    #[instrument(level = "info", skip_all, fields(%base_url))]
    async fn extract(&self, content: &str, base_url: &str) -> Result<String, ApiError> {
        let system = format!("{EXTRACT_SYSTEM_PROMPT}\nThe base URL is {base_url}.");
        self.chat(&system, content).await
    }

    #[instrument(level = "info", skip_all)]
    async fn summarize(&self, content: &str) -> Result<String, ApiError> {
        self.chat(SUMMARIZE_SYSTEM_PROMPT, content).await
    }
}

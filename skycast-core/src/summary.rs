//! AI weather summaries.
//!
//! The summarizer is an external capability that may fail; nothing past
//! [`request_summary`] ever sees an error. The summary surface is never empty
//! and never propagates a failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::SummaryRequest;

/// Shown whenever the summarization capability fails, for any reason.
pub const SUMMARY_FALLBACK: &str =
    "Could not generate a weather summary at this time. Please try again later.";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Summarizer settings stored in config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Ollama-compatible server base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Summarization capability: structured weather data in, one summary out.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, SummaryError>;
}

/// Client for an Ollama-compatible `/api/chat` endpoint.
#[derive(Debug)]
pub struct OllamaSummarizer {
    client: Client,
    config: SummarizerConfig,
}

impl OllamaSummarizer {
    pub fn new(config: SummarizerConfig) -> Result<Self, SummaryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SummaryError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }
}

const SYSTEM_PROMPT: &str = "You are a helpful weather forecaster. You will generate a short, \
     human-readable summary of the weather forecast for the next few hours based on the \
     provided data.";

fn user_prompt(request: &SummaryRequest) -> String {
    format!(
        "Current Weather Data:\n\
         Temperature: {}°C\n\
         Humidity: {}%\n\
         Wind Speed: {} km/h\n\
         Conditions: {}\n\n\
         Summary:",
        request.temperature, request.humidity, request.wind_speed, request.conditions
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, SummaryError> {
        let chat_request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user".to_string(), content: user_prompt(request) },
            ],
            stream: false,
        };

        debug!(model = %self.config.model, "requesting weather summary");

        let response = self
            .client
            .post(self.api_url())
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| SummaryError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummaryError::RequestFailed(format!("HTTP {status}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::Parse(e.to_string()))?;

        let summary = parsed.message.content.trim().to_string();
        if summary.is_empty() {
            return Err(SummaryError::Parse("empty summary in response".to_string()));
        }

        Ok(summary)
    }
}

/// Invoke the summarizer, absorbing every failure into the fixed fallback.
pub async fn request_summary(summarizer: &dyn Summarizer, request: &SummaryRequest) -> String {
    match summarizer.summarize(request).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!(error = %e, "summarization failed, using fallback text");
            SUMMARY_FALLBACK.to_string()
        }
    }
}

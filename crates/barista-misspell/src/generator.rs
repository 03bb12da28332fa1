//! `MisspellGenerator` trait and the Anthropic Messages API client.

use crate::error::GenerationError;
use crate::parse::parse_misspelling;
use crate::prompt::{user_message, SYSTEM_PROMPT};
use async_trait::async_trait;
use barista_types::{MisspellRequest, MisspellResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_max_tokens() -> u32 {
    200
}

fn default_timeout_secs() -> u64 {
    30
}

/// Connection settings for the text-generation provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Output-size ceiling for a single generation.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_version: default_api_version(),
        }
    }
}

impl GeneratorConfig {
    /// Per-request bound. Zero is raised to one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Produces a misspelling for one order.
///
/// Implementors must be `Send + Sync` so they can be shared across request
/// handlers as `Arc<dyn MisspellGenerator>`.
#[async_trait]
pub trait MisspellGenerator: Send + Sync {
    async fn generate(&self, request: &MisspellRequest) -> Result<MisspellResult, GenerationError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [ChatMessage; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Calls the Anthropic Messages API.
///
/// The HTTP client carries the per-request timeout from
/// [`GeneratorConfig::timeout_secs`]; there are no retries.
pub struct AnthropicGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl AnthropicGenerator {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Sends the request and returns the raw text of the first content block.
    async fn complete(&self, request: &MisspellRequest) -> Result<String, GenerationError> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: SYSTEM_PROMPT,
            messages: [ChatMessage {
                role: "user",
                content: user_message(request),
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Request(format!("invalid response envelope: {}", e)))?;

        match envelope.content.into_iter().next() {
            Some(ContentBlock {
                kind,
                text: Some(text),
            }) if kind == "text" => Ok(text),
            _ => Err(GenerationError::EmptyResponse),
        }
    }
}

#[async_trait]
impl MisspellGenerator for AnthropicGenerator {
    async fn generate(&self, request: &MisspellRequest) -> Result<MisspellResult, GenerationError> {
        let text = self.complete(request).await?;
        debug!(seed = request.variety_seed, chars = text.len(), "generation returned text");
        parse_misspelling(&text)
    }
}

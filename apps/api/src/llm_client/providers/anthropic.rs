use serde::Deserialize;
use serde_json::{json, Value};

use super::{missing_field, parse_envelope, AuthScheme, ProviderAdapter, MAX_TOKENS};
use crate::llm_client::LlmError;

pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Anthropic Messages API. Raw key in `x-api-key`.
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    endpoint: String,
    model: String,
}

impl AnthropicAdapter {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }
}

impl Default for AnthropicAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn id(&self) -> &'static str {
        "anthropic"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn auth(&self) -> AuthScheme {
        AuthScheme::ApiKeyHeader("x-api-key")
    }

    fn extra_headers(&self) -> Vec<(&'static str, &'static str)> {
        vec![("anthropic-version", ANTHROPIC_VERSION)]
    }

    fn build_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }

    fn parse_response(&self, raw_body: &str) -> Result<String, LlmError> {
        let envelope: MessagesResponse = parse_envelope(self.id(), raw_body)?;
        envelope
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| missing_field(self.id(), "content[0].text"))
    }
}

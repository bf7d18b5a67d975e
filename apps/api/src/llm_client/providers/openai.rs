use serde::Deserialize;
use serde_json::{json, Value};

use super::{missing_field, parse_envelope, AuthScheme, ProviderAdapter, MAX_TOKENS};
use crate::llm_client::LlmError;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI Chat Completions.
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    endpoint: String,
    model: String,
}

impl OpenAiAdapter {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }
}

impl Default for OpenAiAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn id(&self) -> &'static str {
        "openai"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn auth(&self) -> AuthScheme {
        AuthScheme::Bearer
    }

    fn build_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": MAX_TOKENS,
        })
    }

    fn parse_response(&self, raw_body: &str) -> Result<String, LlmError> {
        let envelope: ChatCompletion = parse_envelope(self.id(), raw_body)?;
        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| missing_field(self.id(), "choices[0].message.content"))
    }
}

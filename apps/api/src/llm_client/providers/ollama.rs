use serde::Deserialize;
use serde_json::{json, Value};

use super::{missing_field, parse_envelope, AuthScheme, ProviderAdapter};
use crate::llm_client::LlmError;

/// Default Ollama generate endpoint on the local network.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "llama2";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Ollama generate API. No credential; streaming disabled.
#[derive(Debug, Clone)]
pub struct OllamaAdapter {
    endpoint: String,
    model: String,
}

impl OllamaAdapter {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }
}

impl Default for OllamaAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
    }
}

impl ProviderAdapter for OllamaAdapter {
    fn id(&self) -> &'static str {
        "ollama"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn auth(&self) -> AuthScheme {
        AuthScheme::None
    }

    fn build_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        })
    }

    fn parse_response(&self, raw_body: &str) -> Result<String, LlmError> {
        let envelope: GenerateResponse = parse_envelope(self.id(), raw_body)?;
        envelope
            .response
            .ok_or_else(|| missing_field(self.id(), "response"))
    }
}

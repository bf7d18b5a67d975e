use serde::Deserialize;
use serde_json::{json, Value};

use super::{missing_field, parse_envelope, AuthScheme, ProviderAdapter, MAX_TOKENS};
use crate::llm_client::LlmError;

/// Hosted inference base URL; the model id is appended as a path.
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-2-7b-chat-hf";
const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: Option<String>,
}

/// Hugging Face hosted inference (text generation task).
#[derive(Debug, Clone)]
pub struct HuggingFaceAdapter {
    endpoint: String,
    model: String,
}

impl HuggingFaceAdapter {
    pub fn new(base_url: &str, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), model),
            model,
        }
    }
}

impl Default for HuggingFaceAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL)
    }
}

impl ProviderAdapter for HuggingFaceAdapter {
    fn id(&self) -> &'static str {
        "huggingface"
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
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": MAX_TOKENS,
                "temperature": TEMPERATURE,
            },
        })
    }

    fn parse_response(&self, raw_body: &str) -> Result<String, LlmError> {
        let generations: Vec<Generation> = parse_envelope(self.id(), raw_body)?;
        generations
            .into_iter()
            .next()
            .and_then(|g| g.generated_text)
            .ok_or_else(|| missing_field(self.id(), "[0].generated_text"))
    }
}

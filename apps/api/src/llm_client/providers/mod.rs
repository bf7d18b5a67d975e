//! Provider adapters — one per remote analysis provider.
//!
//! Each adapter knows its endpoint, model, auth scheme, request body shape, and
//! where the model's text lives in the response envelope. Everything else
//! (transport, status handling, sanitizing, decoding) is shared.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::llm_client::{LlmError, ProviderRequest};

pub mod anthropic;
pub mod huggingface;
pub mod ollama;
pub mod openai;

pub use anthropic::AnthropicAdapter;
pub use huggingface::HuggingFaceAdapter;
pub use ollama::OllamaAdapter;
pub use openai::OpenAiAdapter;

/// Default completion budget sent to every provider that accepts one.
pub const MAX_TOKENS: u32 = 2000;

/// How a provider expects the credential to be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Raw key in a provider-specific header.
    ApiKeyHeader(&'static str),
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// No credential (local-network providers).
    None,
}

pub trait ProviderAdapter: Send + Sync {
    /// Registry identifier, e.g. `"openai"`.
    fn id(&self) -> &'static str;
    fn endpoint(&self) -> &str;
    fn model(&self) -> &str;
    fn auth(&self) -> AuthScheme;

    /// Provider-specific JSON body for the canonical prompt.
    fn build_body(&self, prompt: &str) -> Value;

    /// Extracts the model's raw text from a provider envelope.
    fn parse_response(&self, raw_body: &str) -> Result<String, LlmError>;

    /// Headers sent on every request besides content type and auth.
    fn extra_headers(&self) -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    fn requires_credential(&self) -> bool {
        self.auth() != AuthScheme::None
    }

    fn build_request(&self, prompt: &str, credential: Option<&str>) -> ProviderRequest {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

        match (self.auth(), credential) {
            (AuthScheme::ApiKeyHeader(name), Some(key)) => {
                headers.push((name.to_string(), key.to_string()));
            }
            (AuthScheme::Bearer, Some(key)) => {
                headers.push(("Authorization".to_string(), format!("Bearer {key}")));
            }
            _ => {}
        }

        headers.extend(
            self.extra_headers()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        ProviderRequest {
            url: self.endpoint().to_string(),
            method: Method::POST,
            headers,
            body: self.build_body(prompt),
        }
    }
}

/// Deserializes a provider envelope; any shape mismatch is a malformed response.
pub(crate) fn parse_envelope<T: DeserializeOwned>(
    provider: &str,
    raw_body: &str,
) -> Result<T, LlmError> {
    serde_json::from_str(raw_body)
        .map_err(|e| LlmError::MalformedProviderResponse(format!("{provider}: {e}")))
}

pub(crate) fn missing_field(provider: &str, path: &str) -> LlmError {
    LlmError::MalformedProviderResponse(format!("{provider}: missing {path}"))
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Model output every sample envelope wraps.
    pub const SAMPLE_OUTPUT: &str = r#"```json
{
  "highPriority": ["Due Diligence", "Valuation", "Financial Modeling"],
  "mediumPriority": ["Private Equity", "KYC"],
  "technicalSkills": ["Excel", "Bloomberg"],
  "softSkills": ["Communication"],
  "industryTerms": ["Buy Side"],
  "actionVerbs": ["Executed", "Analyzed"]
}
```"#;

    pub const CATEGORY_KEYS: [&str; 6] = [
        "highPriority",
        "mediumPriority",
        "technicalSkills",
        "softSkills",
        "industryTerms",
        "actionVerbs",
    ];

    /// Asserts the extracted text sanitizes into an object with exactly the six keys.
    pub fn assert_six_keys(text: &str) {
        let sanitized = crate::llm_client::sanitize_output(text);
        let value: serde_json::Value = serde_json::from_str(&sanitized).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 6);
        for key in CATEGORY_KEYS {
            assert!(object.contains_key(key), "missing {key}");
        }
    }
}

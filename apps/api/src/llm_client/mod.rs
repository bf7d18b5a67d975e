/// LLM Client — the single point of entry for all remote provider calls.
///
/// ARCHITECTURAL RULE: No other module may talk to a provider API directly.
/// Request shaping and envelope parsing live in `providers`; transport, status
/// handling, fence stripping, and JSON decoding live here.
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::keywords::models::RawKeywords;

pub mod providers;
pub mod registry;

pub use providers::ProviderAdapter;
pub use registry::ProviderRegistry;

/// Longest slice of an error body carried into `LlmError::ProviderRequestFailed`.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Unsupported LLM provider: {0}")]
    UnsupportedProvider(String),

    #[error("HTTP error: {0}")]
    ProviderNetwork(#[from] reqwest::Error),

    #[error("API request failed (status {status}): {message}")]
    ProviderRequestFailed { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    MalformedProviderResponse(String),

    #[error("Unparsable provider output: {0}")]
    UnparsableProviderOutput(#[from] serde_json::Error),
}

impl LlmError {
    /// Everything except a configuration error is absorbed by local fallback.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LlmError::UnsupportedProvider(_))
    }
}

/// A fully shaped provider request, ready for the transport.
#[derive(Clone)]
pub struct ProviderRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl ProviderRequest {
    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Header values may carry credentials, so only names are printed.
impl std::fmt::Debug for ProviderRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("ProviderRequest")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &names)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one provider request. Swappable so the pipeline can run without a network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ProviderRequest) -> Result<TransportResponse, LlmError>;
}

/// reqwest-backed transport. One request per call; no retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
}

impl LlmClient {
    pub fn new() -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
        })
    }
}

#[async_trait]
impl Transport for LlmClient {
    async fn send(&self, request: &ProviderRequest) -> Result<TransportResponse, LlmError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.json(&request.body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

/// Runs one provider end-to-end: build → send → status check → parse → sanitize → decode.
pub async fn call_provider(
    adapter: &dyn ProviderAdapter,
    transport: &dyn Transport,
    prompt: &str,
    credential: Option<&str>,
) -> Result<RawKeywords, LlmError> {
    let request = adapter.build_request(prompt, credential);
    debug!("Calling provider {} at {}", adapter.id(), request.url);

    let response = transport.send(&request).await?;
    if !response.is_success() {
        return Err(LlmError::ProviderRequestFailed {
            status: response.status,
            message: response.body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    let text = adapter.parse_response(&response.body)?;
    decode_keywords(&sanitize_output(&text))
}

/// Strips every ```json / ``` fence (and the newline after it), then surrounding whitespace.
pub fn sanitize_output(text: &str) -> String {
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Decodes sanitized model output into the six category lists.
pub fn decode_keywords(text: &str) -> Result<RawKeywords, LlmError> {
    serde_json::from_str(text).map_err(LlmError::UnparsableProviderOutput)
}

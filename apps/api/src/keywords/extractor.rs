//! Extraction Orchestrator — picks local matching or a remote provider, and falls
//! back to local matching whenever the remote attempt fails.
//!
//! The remote attempt is an explicit `Result`; only `UnsupportedProvider` escapes
//! `extract`. Every other failure becomes a diagnostic on a locally computed result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::keywords::matcher::LexicalMatcher;
use crate::keywords::models::ExtractionResult;
use crate::keywords::prompts::build_keyword_prompt;
use crate::llm_client::{call_provider, LlmError, ProviderAdapter, ProviderRegistry, Transport};

/// How a caller wants the text analyzed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Local,
    Remote {
        #[serde(rename = "providerId")]
        provider_id: String,
        #[serde(default)]
        credential: Option<String>,
    },
}

// Credentials never reach logs.
impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Local => f.write_str("Local"),
            Strategy::Remote {
                provider_id,
                credential,
            } => f
                .debug_struct("Remote")
                .field("provider_id", provider_id)
                .field("credential", &credential.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub text: String,
    pub strategy: Strategy,
}

#[cfg(test)]
impl AnalysisRequest {
    pub fn local(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strategy: Strategy::Local,
        }
    }

    pub fn remote(
        text: impl Into<String>,
        provider_id: impl Into<String>,
        credential: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            strategy: Strategy::Remote {
                provider_id: provider_id.into(),
                credential,
            },
        }
    }
}

/// Which path produced the keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    Local,
    Remote,
    /// Remote attempt failed; keywords come from local matching.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionOutcome {
    pub keywords: ExtractionResult,
    pub source: ExtractionSource,
    /// Provider that was attempted, if any.
    pub provider: Option<String>,
    /// Non-fatal description of a remote failure absorbed by fallback.
    pub diagnostic: Option<String>,
}

impl ExtractionOutcome {
    pub fn local(keywords: ExtractionResult) -> Self {
        Self {
            keywords,
            source: ExtractionSource::Local,
            provider: None,
            diagnostic: None,
        }
    }

    pub fn fallback(
        keywords: ExtractionResult,
        provider: impl Into<String>,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            keywords,
            source: ExtractionSource::Fallback,
            provider: Some(provider.into()),
            diagnostic: Some(diagnostic.into()),
        }
    }
}

/// Stateless between calls; safe to share behind an `Arc`.
#[derive(Clone)]
pub struct KeywordExtractor {
    matcher: Arc<LexicalMatcher>,
    registry: Arc<ProviderRegistry>,
    transport: Arc<dyn Transport>,
}

impl KeywordExtractor {
    pub fn new(
        matcher: Arc<LexicalMatcher>,
        registry: Arc<ProviderRegistry>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            matcher,
            registry,
            transport,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Local lexical extraction. Also the fallback path.
    pub fn extract_local(&self, text: &str) -> ExtractionResult {
        self.matcher.extract(text)
    }

    /// Runs one extraction. Fails only with `LlmError::UnsupportedProvider`.
    pub async fn extract(&self, request: &AnalysisRequest) -> Result<ExtractionOutcome, LlmError> {
        let (provider_id, credential) = match &request.strategy {
            Strategy::Local => {
                return Ok(self.local_outcome(&request.text));
            }
            Strategy::Remote {
                provider_id,
                credential,
            } => (provider_id, credential),
        };

        let adapter = self.registry.get(provider_id)?;

        let credential = credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        if adapter.requires_credential() && credential.is_none() {
            debug!(
                "No credential for provider {}, using local extraction",
                adapter.id()
            );
            return Ok(self.local_outcome(&request.text));
        }

        match self
            .attempt_remote(adapter.as_ref(), &request.text, credential)
            .await
        {
            Ok(keywords) => {
                debug!(
                    "Remote extraction via {} returned {} keywords",
                    adapter.id(),
                    keywords.total()
                );
                Ok(ExtractionOutcome {
                    keywords,
                    source: ExtractionSource::Remote,
                    provider: Some(adapter.id().to_string()),
                    diagnostic: None,
                })
            }
            Err(e) if e.is_recoverable() => {
                warn!(
                    "Remote extraction via {} failed, falling back to local: {}",
                    adapter.id(),
                    e
                );
                Ok(ExtractionOutcome::fallback(
                    self.extract_local(&request.text),
                    adapter.id(),
                    e.to_string(),
                ))
            }
            Err(e) => Err(e),
        }
    }

    async fn attempt_remote(
        &self,
        adapter: &dyn ProviderAdapter,
        text: &str,
        credential: Option<&str>,
    ) -> Result<ExtractionResult, LlmError> {
        let prompt = build_keyword_prompt(text);
        let raw = call_provider(adapter, self.transport.as_ref(), &prompt, credential).await?;
        Ok(ExtractionResult::normalize(raw))
    }

    fn local_outcome(&self, text: &str) -> ExtractionOutcome {
        let keywords = self.extract_local(text);
        debug!("Local extraction returned {} keywords", keywords.total());
        ExtractionOutcome::local(keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::models::TermCategory;
    use crate::keywords::terms::TermDatabase;
    use crate::llm_client::providers::OllamaAdapter;
    use crate::llm_client::testing::StubTransport;
    use crate::llm_client::LlmClient;
    use serde_json::json;

    const JD: &str = "Transaction advisory associate. Due diligence, due diligence, due diligence \
                      and valuation. Excel and SQL. Strong communication.";

    fn extractor_with(transport: Arc<StubTransport>) -> KeywordExtractor {
        let matcher = LexicalMatcher::new(&TermDatabase::builtin()).unwrap();
        KeywordExtractor::new(
            Arc::new(matcher),
            Arc::new(ProviderRegistry::with_defaults()),
            transport,
        )
    }

    fn openai_reply(content: &str) -> String {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }).to_string()
    }

    #[tokio::test]
    async fn test_local_strategy_never_calls_transport() {
        let transport = Arc::new(StubTransport::new(200, "{}"));
        let extractor = extractor_with(transport.clone());

        let outcome = extractor.extract(&AnalysisRequest::local(JD)).await.unwrap();
        assert_eq!(outcome.source, ExtractionSource::Local);
        assert_eq!(outcome.keywords, extractor.extract_local(JD));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_success_is_normalized() {
        let content = json!({
            "highPriority": ["Due Diligence", "due diligence", "  ", "Valuation", "A", "B", "C", "D", "E", "F", "G"],
            "mediumPriority": [],
            "technicalSkills": [" Excel "],
            "softSkills": [],
            "industryTerms": [],
            "actionVerbs": []
        })
        .to_string();
        let transport = Arc::new(StubTransport::new(200, openai_reply(&content)));
        let extractor = extractor_with(transport.clone());

        let outcome = extractor
            .extract(&AnalysisRequest::remote(JD, "openai", Some("sk-test".into())))
            .await
            .unwrap();

        assert_eq!(outcome.source, ExtractionSource::Remote);
        assert_eq!(outcome.provider.as_deref(), Some("openai"));
        let high = outcome.keywords.get(TermCategory::PriorityHigh);
        assert_eq!(high.len(), 8);
        assert_eq!(high[..3], ["Due Diligence", "Valuation", "A"]);
        assert_eq!(outcome.keywords.get(TermCategory::TechnicalSkill), ["Excel"]);

        let request = transport.last_request().unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer sk-test"));
        assert!(request.body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains(JD));
    }

    #[tokio::test]
    async fn test_request_failure_falls_back_to_local() {
        let transport = Arc::new(StubTransport::new(500, "upstream exploded"));
        let extractor = extractor_with(transport.clone());

        let outcome = extractor
            .extract(&AnalysisRequest::remote(JD, "anthropic", Some("sk-ant".into())))
            .await
            .unwrap();

        assert_eq!(outcome.source, ExtractionSource::Fallback);
        assert_eq!(outcome.keywords, extractor.extract_local(JD));
        assert!(outcome.diagnostic.unwrap().contains("500"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_unparsable_output_falls_back_to_local() {
        let transport = Arc::new(StubTransport::new(
            200,
            openai_reply("Sure! Here are the keywords: Excel, SQL."),
        ));
        let extractor = extractor_with(transport);

        let outcome = extractor
            .extract(&AnalysisRequest::remote(JD, "openai", Some("sk".into())))
            .await
            .unwrap();
        assert_eq!(outcome.source, ExtractionSource::Fallback);
        assert_eq!(outcome.keywords, extractor.extract_local(JD));
        assert!(outcome.diagnostic.unwrap().starts_with("Unparsable provider output"));
    }

    #[tokio::test]
    async fn test_malformed_envelope_falls_back_to_local() {
        let transport = Arc::new(StubTransport::new(200, r#"{"choices": []}"#));
        let extractor = extractor_with(transport.clone());

        let outcome = extractor
            .extract(&AnalysisRequest::remote(JD, "openai", Some("sk".into())))
            .await
            .unwrap();
        assert_eq!(outcome.source, ExtractionSource::Fallback);
        assert_eq!(outcome.keywords, extractor.extract_local(JD));
        assert!(outcome.diagnostic.unwrap().starts_with("Malformed provider response"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_to_local() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut registry = ProviderRegistry::new();
        registry.register(OllamaAdapter::new(format!("http://{addr}/api/generate"), "llama2"));
        let extractor = KeywordExtractor::new(
            Arc::new(LexicalMatcher::new(&TermDatabase::builtin()).unwrap()),
            Arc::new(registry),
            Arc::new(LlmClient::new().unwrap()),
        );

        let outcome = extractor
            .extract(&AnalysisRequest::remote(JD, "ollama", None))
            .await
            .unwrap();
        assert_eq!(outcome.source, ExtractionSource::Fallback);
        assert_eq!(outcome.provider.as_deref(), Some("ollama"));
        assert_eq!(outcome.keywords, extractor.extract_local(JD));
        assert!(outcome.diagnostic.unwrap().starts_with("HTTP error"));
    }

    #[tokio::test]
    async fn test_unknown_provider_is_fatal_without_fallback() {
        let transport = Arc::new(StubTransport::new(200, "{}"));
        let extractor = extractor_with(transport.clone());

        let err = extractor
            .extract(&AnalysisRequest::remote(JD, "gemini", Some("key".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::UnsupportedProvider(id) if id == "gemini"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_credential_uses_local_without_calling_provider() {
        let transport = Arc::new(StubTransport::new(200, "{}"));
        let extractor = extractor_with(transport.clone());

        let outcome = extractor
            .extract(&AnalysisRequest::remote(JD, "huggingface", Some("   ".into())))
            .await
            .unwrap();
        assert_eq!(outcome.source, ExtractionSource::Local);
        assert!(outcome.diagnostic.is_none());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_ollama_needs_no_credential() {
        let body = json!({ "response": r#"{"actionVerbs": ["Structured"]}"#, "done": true });
        let transport = Arc::new(StubTransport::new(200, body.to_string()));
        let extractor = extractor_with(transport.clone());

        let outcome = extractor
            .extract(&AnalysisRequest::remote(JD, "ollama", None))
            .await
            .unwrap();
        assert_eq!(outcome.source, ExtractionSource::Remote);
        assert_eq!(outcome.keywords.get(TermCategory::ActionVerb), ["Structured"]);
        assert!(outcome.keywords.get(TermCategory::PriorityHigh).is_empty());
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_strategy_deserializes_from_wire_shape() {
        let local: Strategy = serde_json::from_str(r#"{"mode": "local"}"#).unwrap();
        assert_eq!(local, Strategy::Local);

        let remote: Strategy = serde_json::from_str(
            r#"{"mode": "remote", "providerId": "openai", "credential": "sk"}"#,
        )
        .unwrap();
        assert_eq!(
            remote,
            Strategy::Remote {
                provider_id: "openai".into(),
                credential: Some("sk".into())
            }
        );
    }

    #[test]
    fn test_strategy_debug_redacts_credential() {
        let strategy = Strategy::Remote {
            provider_id: "openai".into(),
            credential: Some("sk-very-secret".into()),
        };
        let rendered = format!("{strategy:?}");
        assert!(rendered.contains("openai"));
        assert!(!rendered.contains("sk-very-secret"));
    }
}

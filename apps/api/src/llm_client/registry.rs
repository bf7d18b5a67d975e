//! Provider registry — maps provider ids to adapters.
//!
//! Dispatch looks a provider up exactly once; adding a provider means adding an
//! adapter and one `register` call here, never another branch elsewhere.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{Config, ProviderOverride};
use crate::llm_client::providers::{
    anthropic, huggingface, ollama, openai, AnthropicAdapter, HuggingFaceAdapter, OllamaAdapter,
    OpenAiAdapter, ProviderAdapter,
};
use crate::llm_client::LlmError;

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: BTreeMap<&'static str, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in providers with their stock endpoints and models.
    #[cfg(test)]
    pub fn with_defaults() -> Self {
        Self::from_config(&Config::default())
    }

    /// All built-in providers, applying any endpoint/model overrides from config.
    pub fn from_config(config: &Config) -> Self {
        let pick = |o: &ProviderOverride, endpoint: &str, model: &str| {
            (
                o.endpoint.clone().unwrap_or_else(|| endpoint.to_string()),
                o.model.clone().unwrap_or_else(|| model.to_string()),
            )
        };

        let mut registry = Self::new();

        let (endpoint, model) = pick(
            &config.anthropic,
            anthropic::DEFAULT_ENDPOINT,
            anthropic::DEFAULT_MODEL,
        );
        registry.register(AnthropicAdapter::new(endpoint, model));

        let (endpoint, model) = pick(&config.openai, openai::DEFAULT_ENDPOINT, openai::DEFAULT_MODEL);
        registry.register(OpenAiAdapter::new(endpoint, model));

        let (endpoint, model) = pick(&config.ollama, ollama::DEFAULT_ENDPOINT, ollama::DEFAULT_MODEL);
        registry.register(OllamaAdapter::new(endpoint, model));

        let (base_url, model) = pick(
            &config.huggingface,
            huggingface::DEFAULT_BASE_URL,
            huggingface::DEFAULT_MODEL,
        );
        registry.register(HuggingFaceAdapter::new(&base_url, model));

        registry
    }

    /// Registers an adapter under its own id, replacing any previous one.
    pub fn register(&mut self, adapter: impl ProviderAdapter + 'static) {
        self.adapters.insert(adapter.id(), Arc::new(adapter));
    }

    /// Looks up a provider. Ids are matched case-insensitively, ignoring surrounding whitespace.
    pub fn get(&self, provider_id: &str) -> Result<Arc<dyn ProviderAdapter>, LlmError> {
        let key = provider_id.trim().to_ascii_lowercase();
        self.adapters
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| LlmError::UnsupportedProvider(provider_id.to_string()))
    }

    /// Adapters in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ProviderAdapter>> {
        self.adapters.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_register_four_providers() {
        let registry = ProviderRegistry::with_defaults();
        let ids: Vec<&str> = registry.iter().map(|a| a.id()).collect();
        assert_eq!(ids, ["anthropic", "huggingface", "ollama", "openai"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(registry.get(" OpenAI ").unwrap().id(), "openai");
    }

    #[test]
    fn test_unknown_provider_is_unsupported() {
        let registry = ProviderRegistry::with_defaults();
        match registry.get("gemini") {
            Err(LlmError::UnsupportedProvider(id)) => assert_eq!(id, "gemini"),
            _ => panic!("expected UnsupportedProvider"),
        }
    }

    #[test]
    fn test_config_overrides_endpoint_and_model() {
        let config = Config {
            ollama: ProviderOverride {
                endpoint: Some("http://gpu-box:11434/api/generate".to_string()),
                model: Some("mistral".to_string()),
            },
            huggingface: ProviderOverride {
                endpoint: Some("http://tgi.local/models".to_string()),
                model: None,
            },
            ..Config::default()
        };
        let registry = ProviderRegistry::from_config(&config);

        let ollama = registry.get("ollama").unwrap();
        assert_eq!(ollama.endpoint(), "http://gpu-box:11434/api/generate");
        assert_eq!(ollama.model(), "mistral");

        let hf = registry.get("huggingface").unwrap();
        assert_eq!(
            hf.endpoint(),
            "http://tgi.local/models/meta-llama/Llama-2-7b-chat-hf"
        );
        assert_eq!(
            registry.get("openai").unwrap().endpoint(),
            openai::DEFAULT_ENDPOINT
        );
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = ProviderRegistry::new();
        assert_eq!(registry.iter().count(), 0);
        registry.register(OllamaAdapter::default());
        registry.register(OllamaAdapter::new("http://other/api/generate", "phi"));
        assert_eq!(registry.iter().count(), 1);
        assert_eq!(registry.get("ollama").unwrap().model(), "phi");
    }
}

use std::sync::Arc;

use crate::config::Config;
use crate::keywords::extractor::KeywordExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless orchestrator over the compiled matcher, provider registry, and transport.
    pub extractor: Arc<KeywordExtractor>,
    pub config: Config,
}

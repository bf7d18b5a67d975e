//! Axum route handlers for the Keywords API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::keywords::extractor::{AnalysisRequest, ExtractionOutcome, Strategy};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Absent or empty text is valid and yields empty categories.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: &'static str,
    pub endpoint: String,
    pub model: String,
    pub requires_credential: bool,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/keywords/extract
///
/// Extracts categorized keywords locally or through the named provider.
/// A remote call that outlives `REMOTE_TIMEOUT_SECS` is abandoned and answered locally.
pub async fn handle_extract(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractionOutcome>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let request = AnalysisRequest {
        text: request.text,
        strategy: request.strategy,
    };

    let timeout = state.config.remote_timeout();
    match tokio::time::timeout(timeout, state.extractor.extract(&request)).await {
        Ok(outcome) => Ok(Json(outcome?)),
        Err(_) => {
            let provider = match &request.strategy {
                Strategy::Remote { provider_id, .. } => provider_id.clone(),
                Strategy::Local => String::new(),
            };
            warn!(
                "Remote extraction via {} timed out after {}s, falling back to local",
                provider,
                timeout.as_secs()
            );
            Ok(Json(ExtractionOutcome::fallback(
                state.extractor.extract_local(&request.text),
                provider,
                format!("timed out after {}s", timeout.as_secs()),
            )))
        }
    }
}

/// GET /api/v1/providers
///
/// Lists registered providers so callers can build a provider picker.
pub async fn handle_list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let providers = state
        .extractor
        .registry()
        .iter()
        .map(|adapter| ProviderInfo {
            id: adapter.id(),
            endpoint: adapter.endpoint().to_string(),
            model: adapter.model().to_string(),
            requires_credential: adapter.requires_credential(),
        })
        .collect();

    Json(ProvidersResponse { providers })
}

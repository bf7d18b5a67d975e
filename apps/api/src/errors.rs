use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::UnsupportedProvider(id) => AppError::UnsupportedProvider(id),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedProvider(id) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_PROVIDER",
                format!("Unsupported LLM provider: {id}"),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_provider_maps_to_bad_request() {
        let error: AppError = LlmError::UnsupportedProvider("gemini".into()).into();
        assert!(matches!(error, AppError::UnsupportedProvider(ref id) if id == "gemini"));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("bad body".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_llm_errors_map_to_bad_gateway() {
        let error: AppError = LlmError::MalformedProviderResponse("openai: missing choices".into()).into();
        assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}

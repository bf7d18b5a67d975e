pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::keywords::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Keywords API
        .route("/api/v1/keywords/extract", post(handlers::handle_extract))
        .route("/api/v1/providers", get(handlers::handle_list_providers))
        .with_state(state)
}

mod config;
mod errors;
mod keywords;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::keywords::extractor::KeywordExtractor;
use crate::keywords::matcher::LexicalMatcher;
use crate::keywords::terms::TermDatabase;
use crate::llm_client::{LlmClient, ProviderRegistry};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS keyword service v{}", env!("CARGO_PKG_VERSION"));

    // Term database is loaded once and never mutated
    let terms = match &config.term_database_path {
        Some(path) => {
            info!("Loading term database from {}", path.display());
            TermDatabase::from_json_file(path)?
        }
        None => TermDatabase::builtin(),
    };
    let matcher = LexicalMatcher::new(&terms).context("Failed to compile term patterns")?;
    info!("Lexical matcher ready ({} terms)", terms.term_count());

    let registry = ProviderRegistry::from_config(&config);
    for adapter in registry.iter() {
        info!(
            "Provider registered: {} ({} @ {})",
            adapter.id(),
            adapter.model(),
            adapter.endpoint()
        );
    }

    let transport = LlmClient::new().context("Failed to build HTTP client")?;

    let extractor = KeywordExtractor::new(Arc::new(matcher), Arc::new(registry), Arc::new(transport));

    let state = AppState {
        extractor: Arc::new(extractor),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

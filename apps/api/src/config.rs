use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Optional endpoint/model override for one provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderOverride {
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

impl ProviderOverride {
    fn from_env(prefix: &str) -> Self {
        Self {
            endpoint: optional_env(&format!("{prefix}_API_URL")),
            model: optional_env(&format!("{prefix}_MODEL")),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Everything has a default; provider credentials are never read from here.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON term database replacing the bundled vocabulary.
    pub term_database_path: Option<PathBuf>,
    /// Caller-side ceiling on a remote extraction before falling back to local matching.
    pub remote_timeout_secs: u64,
    pub anthropic: ProviderOverride,
    pub openai: ProviderOverride,
    pub ollama: ProviderOverride,
    pub huggingface: ProviderOverride,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            term_database_path: None,
            remote_timeout_secs: 60,
            anthropic: ProviderOverride::default(),
            openai: ProviderOverride::default(),
            ollama: ProviderOverride::default(),
            huggingface: ProviderOverride::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: parse_env("PORT", defaults.port).context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            term_database_path: optional_env("TERM_DATABASE_PATH").map(PathBuf::from),
            remote_timeout_secs: parse_env("REMOTE_TIMEOUT_SECS", defaults.remote_timeout_secs)
                .context("REMOTE_TIMEOUT_SECS must be a whole number of seconds")?,
            anthropic: ProviderOverride::from_env("ANTHROPIC"),
            openai: ProviderOverride::from_env("OPENAI"),
            ollama: ProviderOverride::from_env("OLLAMA"),
            huggingface: ProviderOverride::from_env("HUGGINGFACE"),
        })
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }
}

/// Unset and blank are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value for '{key}': {raw}")),
        None => Ok(default),
    }
}

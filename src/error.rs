use std::time::Duration;

use thiserror::Error;

/// Configuration validation failures, raised before anything else runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Failures from the chat backend.
///
/// Rate limiting is its own variant so callers can react to it (the web
/// layer maps it to HTTP 429); everything else is surfaced as-is. No
/// variant is retried anywhere.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("failed to initialize chat backend: {0}")]
    Initialization(String),

    #[error("received an empty response from the model")]
    EmptyResponse,

    #[error("Gemini API rate limit exceeded{}", retry_after_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    #[error("Gemini API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Transport(String),
}

fn retry_after_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!(", retry after {}s", wait.as_secs()),
        None => String::new(),
    }
}

//! Error types for the comparison runner

use regress_config::ConfigError;
use regress_store::StoreError;
use thiserror::Error;

/// Errors from the OAuth2 client-credentials exchange
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token request configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("network error during token request to {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("token endpoint {url} answered {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("invalid token response: {reason}")]
    InvalidResponse { reason: String },
}

/// Errors from the shallow JSON comparison
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error("{side} response is {found}, expected a JSON object")]
    NotAnObject {
        side: &'static str,
        found: &'static str,
    },
}

/// Errors raised while processing one use case
///
/// These never abort the run: they are recorded into the use case's result.
#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("use case {name} not found")]
    NotFound { name: String },

    #[error("use case {name} has no payload")]
    MissingPayload { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("JSON rendering failed: {0}")]
    Render(#[from] serde_json::Error),
}

/// Errors that abort the run before any use case is processed
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("use-case store: {0}")]
    Store(#[from] StoreError),

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token acquisition: {0}")]
    Token(#[from] TokenError),
}

//! Error types shared across the harness.

use std::time::Duration;

use thiserror::Error;

pub use crate::config::ConfigError;

/// Errors raised by the HTTP capability.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The underlying client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Connection, TLS, timeout or body-read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A caller-supplied header could not be encoded.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// Top-level error for harness operations.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Http(#[from] HttpError),

    /// A wait that must succeed ran out of budget.
    #[error("condition not met for {url} within {}ms", .waited.as_millis())]
    ConditionTimeout { url: String, waited: Duration },
}

pub type HarnessResult<T> = Result<T, HarnessError>;

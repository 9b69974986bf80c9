use thiserror::Error;
use treadline_core::{Failure, FailureKind};

/// Errors returned by the storefront API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl Failure for ClientError {
    /// Client errors surface as "data unavailable" on reads. Write paths
    /// reclassify them as mutation failures at the cart layer.
    fn kind(&self) -> FailureKind {
        match self {
            ClientError::InvalidBaseUrl { .. } => FailureKind::Validation,
            _ => FailureKind::DataUnavailable,
        }
    }
}

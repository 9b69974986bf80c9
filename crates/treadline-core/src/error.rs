use thiserror::Error;

use crate::notice::{Failure, FailureKind};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown product type: {0}")]
    UnknownProductType(String),

    #[error("invalid sort order \"{0}\"; expected asc or desc")]
    InvalidSortOrder(String),
}

impl Failure for CoreError {
    fn kind(&self) -> FailureKind {
        FailureKind::Validation
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read storefront file {path}: {source}")]
    StorefrontFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse storefront file: {0}")]
    StorefrontFileParse(#[from] serde_yaml::Error),

    #[error("storefront validation failed: {0}")]
    Validation(String),
}

impl Failure for ConfigError {
    fn kind(&self) -> FailureKind {
        match self {
            ConfigError::StorefrontFileIo { .. } => FailureKind::DataUnavailable,
            _ => FailureKind::Validation,
        }
    }
}

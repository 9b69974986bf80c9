use thiserror::Error;
use treadline_core::{Failure, FailureKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FinderError {
    /// A stage was opened or selected before every stage to its left was filled.
    #[error("cannot choose {stage_name} before choosing {missing}")]
    StageLocked {
        stage: usize,
        stage_name: &'static str,
        missing: &'static str,
    },

    #[error("{stage_name} cannot be blank")]
    EmptyValue { stage_name: &'static str },

    #[error("stage {stage} does not exist; this finder has {stages} stages")]
    NoSuchStage { stage: usize, stages: usize },

    #[error("finder is not complete; {missing} is still empty")]
    Incomplete { missing: &'static str },

    #[error("\"{value}\" is not an available {stage_name}")]
    UnknownOption {
        stage_name: &'static str,
        value: String,
    },
}

impl Failure for FinderError {
    fn kind(&self) -> FailureKind {
        FailureKind::Validation
    }
}

#[derive(Debug, Error)]
pub enum GarageError {
    #[error("failed to write saved vehicles to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode saved vehicles: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("vehicle is incomplete and cannot be saved: {0}")]
    IncompleteVehicle(String),
}

impl Failure for GarageError {
    fn kind(&self) -> FailureKind {
        match self {
            GarageError::IncompleteVehicle(_) => FailureKind::Validation,
            GarageError::Io { .. } | GarageError::Encode(_) => FailureKind::MutationFailure,
        }
    }
}

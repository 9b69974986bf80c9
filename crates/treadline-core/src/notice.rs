//! Failure taxonomy shared by every storefront component.
//!
//! No failure is fatal to the whole application. Each crate error maps onto one
//! of three kinds, and the component that produced it turns it into a transient
//! [`Notice`] instead of propagating a crash.

use std::fmt;

use serde::Serialize;

/// Broad class of a failure, used to decide how it is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Reference or product data is loading or could not be fetched.
    /// Recoverable by retry or automatic refetch.
    DataUnavailable,
    /// The user asked for something out of order or incomplete.
    /// Blocks the dependent action only.
    Validation,
    /// A write against the backend failed. Prior state is preserved.
    MutationFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::DataUnavailable => write!(f, "data unavailable"),
            FailureKind::Validation => write!(f, "validation"),
            FailureKind::MutationFailure => write!(f, "mutation failed"),
        }
    }
}

/// A transient, user-facing message (the toast of a storefront UI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: FailureKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Implemented by every crate error so callers can classify it uniformly.
pub trait Failure: fmt::Display {
    fn kind(&self) -> FailureKind;

    fn notice(&self) -> Notice {
        Notice::new(self.kind(), self.to_string())
    }
}

use thiserror::Error;
use treadline_client::ClientError;
use treadline_core::{Failure, FailureKind, RefId};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("quantity {requested} for {product} is outside {min}..={max}")]
    QuantityOutOfRange {
        product: RefId,
        requested: u32,
        min: u32,
        max: u32,
    },

    #[error("product {0} is not in the cart")]
    UnknownItem(RefId),

    #[error("add-on {addon} is not offered for {product}")]
    UnknownAddon { product: RefId, addon: RefId },

    #[error("add-on position {index} is out of range; {available} add-ons are offered")]
    AddonIndexOutOfRange { index: usize, available: usize },

    #[error("failed to load cart: {0}")]
    Fetch(#[source] ClientError),

    #[error("cart {operation} failed: {source}")]
    Mutation {
        operation: &'static str,
        #[source]
        source: ClientError,
    },
}

impl Failure for CartError {
    fn kind(&self) -> FailureKind {
        match self {
            CartError::QuantityOutOfRange { .. }
            | CartError::UnknownItem(_)
            | CartError::UnknownAddon { .. }
            | CartError::AddonIndexOutOfRange { .. } => FailureKind::Validation,
            CartError::Fetch(_) => FailureKind::DataUnavailable,
            CartError::Mutation { .. } => FailureKind::MutationFailure,
        }
    }
}

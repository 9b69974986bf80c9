//! Cart pricing and the optimistic cart session.
//!
//! Totals are computed here and only here. The session layers unsent add-on
//! and installation choices over the last cart read from the backend so that
//! totals update immediately, then reconciles with the backend on sync.

pub mod backend;
pub mod error;
pub mod pricing;
pub mod selection;
pub mod session;

pub use backend::CartBackend;
pub use error::CartError;
pub use pricing::{compute_totals, line_totals, CartTotals, LineTotals};
pub use selection::LineSelection;
pub use session::{quantity_bounds, CartSession, PendingSync};

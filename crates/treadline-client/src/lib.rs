pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::ApiClient;
pub use error::ClientError;
pub use retry::RetryPolicy;
pub use types::{Envelope, ServiceSync};

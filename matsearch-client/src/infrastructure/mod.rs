//! Transport layer: HTTP client, wire types and service seams.

pub mod api_client;
pub mod api_types;
pub mod constants;
pub mod error;
pub mod services;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{ApiError, ApiResult};

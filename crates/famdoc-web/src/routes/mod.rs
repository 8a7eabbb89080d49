//! Route handlers.

pub mod config;
pub mod data_fields;
pub mod families;
pub mod master_data;
pub mod responses;
pub mod surveys;
pub mod users;

use crate::error::ApiError;
use crate::session::SessionIdentity;

/// Fallback for known paths hit with an unsupported method. Requires a
/// session so unauthenticated callers still see `UNAUTHORIZED`.
pub async fn method_not_allowed(_session: SessionIdentity) -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

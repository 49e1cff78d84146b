//! Caller identity extraction.
//!
//! Authentication itself happens upstream (a session-terminating proxy or
//! gateway); by the time a request reaches this service the caller has been
//! resolved and their id travels in the `X-User-Id` header. Handlers read it
//! once here and pass it explicitly into every store operation, so the core
//! never reaches into ambient session state.

use actix_web::HttpRequest;

use crate::store::StoreError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Returns the authenticated caller's id, or `Unauthorized` when the header
/// is missing or blank.
pub fn require_user(req: &HttpRequest) -> Result<String, StoreError> {
    match req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
    {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(StoreError::Unauthorized),
    }
}

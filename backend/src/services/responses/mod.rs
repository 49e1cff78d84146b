//! # ESG Response Service Module
//!
//! Aggregates the API endpoints for yearly ESG response records. It acts as a
//! router, directing incoming HTTP requests under the `/api/responses` path to
//! the handler logic in its sub-modules, and owns the mapping from store
//! errors to HTTP statuses.
//!
//! ## Registered routes:
//!
//! *   **`POST /api/responses`** (`save::process`): creates or updates the
//!     record for the submitted financial year. Absent metric fields default
//!     to zero on creation and are left unchanged on update; the four derived
//!     ratios are always recomputed server-side.
//!
//! *   **`GET /api/responses`** (`list::process`): lists the caller's
//!     non-deleted records, newest financial year first, optionally filtered
//!     with `?financialYear=`.
//!
//! *   **`POST /api/responses/bulk_delete`** (`bulk_delete::process`):
//!     soft-deletes a batch of records, all-or-nothing on ownership.
//!
//! *   **`GET /api/responses/{response_id}`** (`get::process`): fetches a
//!     single record by id, including soft-deleted ones.
//!
//! *   **`DELETE /api/responses/{response_id}`** (`delete::process`):
//!     soft-deletes a single record.
//!
//! Every route resolves the caller from the `X-User-Id` header via
//! `services::auth::require_user` before touching the store.

mod bulk_delete;
mod delete;
mod get;
mod list;
mod save;

use actix_web::web::{delete, get, post, scope};
use actix_web::{HttpResponse, Scope};
use log::error;
use serde_json::json;

use crate::store::StoreError;

/// The base path for all response-related API endpoints.
const API_PATH: &str = "/api/responses";

/// Configures and returns the Actix `Scope` for all response routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(save::process))
        .route("", get().to(list::process))
        .route("/bulk_delete", post().to(bulk_delete::process))
        .route("/{response_id}", get().to(get::process))
        .route("/{response_id}", delete().to(delete::process))
}

/// Maps a store error to its HTTP response.
///
/// The body is always `{"error": "..."}`. `NotFound` keeps absence and
/// foreign ownership indistinguishable; only `StoreUnavailable` is logged,
/// the rest are caller mistakes.
pub(crate) fn error_response(err: StoreError) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        StoreError::InvalidInput(_) => HttpResponse::BadRequest().json(body),
        StoreError::Unauthorized => HttpResponse::Unauthorized().json(body),
        StoreError::NotFound => HttpResponse::NotFound().json(body),
        StoreError::Conflict(_) => HttpResponse::Conflict().json(body),
        StoreError::PartialOwnership => HttpResponse::Forbidden().json(body),
        StoreError::StoreUnavailable(ref reason) => {
            error!("store unavailable: {reason}");
            HttpResponse::ServiceUnavailable().json(body)
        }
    }
}

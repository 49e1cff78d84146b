use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::services::auth::require_user;
use crate::services::responses::error_response;
use crate::store::ResponseStore;

/// Actix web handler for `DELETE /api/responses/{response_id}`.
///
/// Soft-deletes the record: it disappears from listings and frees its
/// `(user, financialYear)` slot, but stays readable by id. Deleting an
/// already-deleted record succeeds silently.
pub(crate) async fn process(
    req: HttpRequest,
    store: web::Data<ResponseStore>,
    response_id: web::Path<String>,
) -> impl Responder {
    let user_id = match require_user(&req) {
        Ok(user_id) => user_id,
        Err(err) => return error_response(err),
    };
    match store.soft_delete(&user_id, &response_id) {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(err) => error_response(err),
    }
}

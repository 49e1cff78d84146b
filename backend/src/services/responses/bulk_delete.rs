use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::requests::BulkDeleteRequest;
use serde_json::json;

use crate::services::auth::require_user;
use crate::services::responses::error_response;
use crate::store::ResponseStore;

/// Actix web handler for `POST /api/responses/bulk_delete`.
///
/// Soft-deletes a batch of records in one transaction. If any id is missing
/// or owned by another user the whole batch fails with `403` and nothing is
/// touched; otherwise the count of newly deleted records is returned.
pub(crate) async fn process(
    req: HttpRequest,
    store: web::Data<ResponseStore>,
    payload: web::Json<BulkDeleteRequest>,
) -> impl Responder {
    let user_id = match require_user(&req) {
        Ok(user_id) => user_id,
        Err(err) => return error_response(err),
    };
    match store.bulk_soft_delete(&user_id, &payload.ids) {
        Ok(deleted) => HttpResponse::Ok().json(json!({ "deleted": deleted })),
        Err(err) => error_response(err),
    }
}

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::services::auth::require_user;
use crate::services::responses::error_response;
use crate::store::ResponseStore;

/// Actix web handler for `GET /api/responses/{response_id}`.
///
/// Fetches a single record by id, soft-deleted ones included. A record owned
/// by another user comes back as `404`, indistinguishable from a missing one.
pub(crate) async fn process(
    req: HttpRequest,
    store: web::Data<ResponseStore>,
    response_id: web::Path<String>,
) -> impl Responder {
    let user_id = match require_user(&req) {
        Ok(user_id) => user_id,
        Err(err) => return error_response(err),
    };
    match store.get_by_id(&user_id, &response_id) {
        Ok(record) => HttpResponse::Ok().json(json!({ "data": record })),
        Err(err) => error_response(err),
    }
}

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::requests::ListResponsesQuery;
use serde_json::json;

use crate::services::auth::require_user;
use crate::services::responses::error_response;
use crate::store::ResponseStore;

/// Actix web handler for `GET /api/responses`.
///
/// Returns the caller's non-deleted records ordered by financial year
/// descending. `?financialYear=` narrows the listing to one year; an empty
/// list is a normal `200`, not an error.
pub(crate) async fn process(
    req: HttpRequest,
    store: web::Data<ResponseStore>,
    query: web::Query<ListResponsesQuery>,
) -> impl Responder {
    let user_id = match require_user(&req) {
        Ok(user_id) => user_id,
        Err(err) => return error_response(err),
    };
    match store.list_active(&user_id, query.financial_year) {
        Ok(responses) => HttpResponse::Ok().json(json!({ "data": responses })),
        Err(err) => error_response(err),
    }
}

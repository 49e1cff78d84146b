use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::requests::UpsertResponseRequest;
use serde_json::json;

use crate::services::auth::require_user;
use crate::services::responses::error_response;
use crate::store::ResponseStore;

/// Actix web handler for `POST /api/responses`.
///
/// Upserts the caller's record for the submitted financial year and returns
/// the full persisted record, derived ratios included, as `201 Created`.
pub(crate) async fn process(
    req: HttpRequest,
    store: web::Data<ResponseStore>,
    payload: web::Json<UpsertResponseRequest>,
) -> impl Responder {
    let user_id = match require_user(&req) {
        Ok(user_id) => user_id,
        Err(err) => return error_response(err),
    };
    match store.upsert(&user_id, payload.financial_year, &payload.metrics()) {
        Ok(record) => HttpResponse::Created().json(json!({ "data": record })),
        Err(err) => error_response(err),
    }
}

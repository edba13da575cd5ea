//! Shared-dataset reset handler

use std::sync::Arc;

use actix_web::{post, web, HttpResponse, Responder};
use querypad_core::{AppContext, PlaygroundError};

use super::models::{error_response, DeleteAllRequest, DeleteAllResponse};

/// POST /api/delete-all-tables
///
/// Requires `{"confirmation": "CONFIRM_DELETE"}`; anything else is rejected
/// before the dataset is touched.
#[post("/delete-all-tables")]
pub async fn delete_all_tables(
    body: web::Json<DeleteAllRequest>,
    app_context: web::Data<Arc<AppContext>>,
) -> impl Responder {
    let confirmation = body.into_inner().confirmation.unwrap_or_default();
    let app_context = app_context.get_ref().clone();

    match web::block(move || app_context.delete_all_tables(&confirmation)).await {
        Ok(Ok(dropped)) => HttpResponse::Ok().json(DeleteAllResponse::new(dropped)),
        Ok(Err(err)) => error_response(&err),
        Err(err) => {
            log::error!("Delete-all task failed: {}", err);
            error_response(&PlaygroundError::Internal(format!("Delete-all task failed: {}", err)))
        },
    }
}

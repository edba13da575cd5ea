//! API routes configuration
//!
//! This module configures all HTTP routes for the QueryPad API.

use actix_web::{error, web, HttpResponse};
use querypad_core::ErrorCode;

use crate::handlers;
use crate::handlers::sql::models::ErrorResponse;

/// Configure API routes for QueryPad
///
/// - POST /api/execute-sql
/// - POST /api/execute-csv-sql
/// - POST /api/generate-sql
/// - POST /api/generate-csv-sql
/// - POST /api/delete-all-tables
/// - GET /health
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(handlers::execute_sql)
            .service(handlers::execute_csv_sql)
            .service(handlers::generate_sql)
            .service(handlers::generate_csv_sql)
            .service(handlers::delete_all_tables),
    )
    .route("/health", web::get().to(handlers::health_handler));
}

/// JSON body extractor settings: size limit plus the standard error body for
/// payloads that are too large or not valid JSON.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default().limit(limit).error_handler(|err, _req| {
        let response = HttpResponse::BadRequest()
            .json(ErrorResponse::new(ErrorCode::InvalidRequest, format!("Invalid request body: {}", err)));
        error::InternalError::from_response(err, response).into()
    })
}

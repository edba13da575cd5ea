//! Liveness probe handler

use actix_web::{HttpResponse, Responder};

use super::models::HealthResponse;

/// GET /health
///
/// Returns 200 OK while the server is running. Does not touch the dataset.
pub async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::healthy())
}

//! Health check handler
//!
//! ## Endpoints
//! - GET /health - liveness probe, unauthenticated

pub mod models;

mod liveness;

pub use liveness::health_handler;

// QueryPad API Library
//
// This crate provides the REST API layer for QueryPad,
// including HTTP handlers, routes, and request/response models.

pub mod handlers;
pub mod routes;

pub use routes::{configure_routes, json_config};

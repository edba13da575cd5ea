//! HTTP request handlers
//!
//! This module provides HTTP handlers for the QueryPad REST API.

pub mod health;
pub mod sql;

pub use health::health_handler;
pub use sql::*;

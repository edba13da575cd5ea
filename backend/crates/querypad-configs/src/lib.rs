//! querypad-configs
//!
//! Server configuration types and loader for QueryPad.

pub mod config;

pub use config::*;
pub use config::defaults;

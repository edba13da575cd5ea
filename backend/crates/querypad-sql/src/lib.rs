//! QueryPad SQL text utilities
//!
//! Everything in this crate works on SQL *text* and never touches an engine:
//! - [`batch_execution`]: split a submission into statements
//! - [`classifier`]: classify a statement by its leading verb
//! - [`policy`]: reject destructive statements before execution
//! - [`cleanup`]: strip markdown/comment noise from generated SQL

pub mod batch_execution;
pub mod classifier;
pub mod cleanup;
pub mod keywords;
pub mod policy;

pub use batch_execution::split_statements;
pub use classifier::{classify, split_and_classify, DdlVerb, MutationVerb, Statement, StatementKind};
pub use cleanup::clean_sql_query;
pub use keywords::SqlKeyword;
pub use policy::{PolicyViolation, SafetyPolicy};

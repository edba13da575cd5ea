//! SQL endpoints
//!
//! ## Endpoints
//! - POST /api/execute-sql - run SQL against the shared dataset, or an attached CSV
//! - POST /api/execute-csv-sql - same, CSV attachment required
//! - POST /api/generate-sql - natural language to SQL
//! - POST /api/generate-csv-sql - same, against an attached CSV
//! - POST /api/delete-all-tables - drop every table in the shared dataset

pub mod models;

mod delete_all;
mod execute;
mod generate;

pub use delete_all::delete_all_tables;
pub use execute::{execute_csv_sql, execute_sql};
pub use generate::{generate_csv_sql, generate_sql};

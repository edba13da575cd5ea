// QueryPad Core Library
//
// Runs ad-hoc SQL against either the shared seeded dataset or a private
// database materialized from an uploaded CSV, and shapes the results for
// presentation. Natural-language SQL generation is an injected capability.

pub mod app_context;
pub mod csv;
pub mod engine;
pub mod error;
pub mod executor;
pub mod format;
pub mod generation;
pub mod orchestrator;

pub use app_context::{AppContext, DELETE_CONFIRMATION};
pub use csv::{parse_csv, ParsedTable};
pub use engine::{EphemeralEngine, SharedDataset, UPLOADED_TABLE};
pub use error::{ErrorCode, PlaygroundError, Result};
pub use executor::{execute_statement, ExecutionResult, Row};
pub use format::{format_table, ColumnInfo, FormattedTable};
pub use generation::{GeminiGenerator, GenerationError, SchemaContext, SqlGenerator};
pub use querypad_sql::{clean_sql_query, SafetyPolicy};
pub use orchestrator::{run_batch, BatchResult, StatementFailure, StatementOutcome};

//! Response bodies for the SQL endpoints
//!
//! # Single statement
//! ```json
//! {
//!   "success": true,
//!   "query": "SELECT Name FROM uploaded_csv",
//!   "results": [{"Name": "Ann"}],
//!   "formattedTable": "+------+\n| Name |\n+------+\n| Ann  |\n+------+",
//!   "message": "Query executed successfully. 1 row(s) returned.",
//!   "columns": {"names": ["Name"], "widths": {"Name": 4}}
//! }
//! ```
//!
//! # Multiple statements
//! ```json
//! {
//!   "success": true,
//!   "query": "SELECT 1 AS a; DROP TABLE Books",
//!   "isMultiStatement": true,
//!   "results": [
//!     {"query": "SELECT 1 AS a", "results": [{"a": 1}], "rowCount": 1, "message": "...", "formattedTable": "..."},
//!     {"query": "DROP TABLE Books", "error": "Destructive operations not allowed in this demo", "code": "POLICY_VIOLATION"}
//!   ],
//!   "message": "SELECT query executed successfully. 1 row(s) returned. Statement 2 failed: ..."
//! }
//! ```
//!
//! # Error
//! ```json
//! {"success": false, "error": "no such table: Missing", "code": "EXECUTION_ERROR"}
//! ```

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use querypad_core::{
    BatchResult, ColumnInfo, ErrorCode, ExecutionResult, PlaygroundError, Row, StatementFailure,
    StatementOutcome,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// `{names, widths}` where widths maps each column name to its width
#[derive(Debug, Clone, Serialize)]
pub struct ColumnsPayload {
    pub names: Vec<String>,
    pub widths: Map<String, Value>,
}

impl From<ColumnInfo> for ColumnsPayload {
    fn from(info: ColumnInfo) -> Self {
        let widths = info
            .names
            .iter()
            .zip(info.widths.iter())
            .map(|(name, width)| (name.clone(), Value::from(*width)))
            .collect();
        Self {
            names: info.names,
            widths,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleStatementResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<Row>,
    pub formatted_table: String,
    pub message: String,
    pub columns: ColumnsPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedEntry {
    pub query: String,
    pub results: Vec<Row>,
    pub row_count: usize,
    pub message: String,
    pub formatted_table: String,
}

impl From<ExecutionResult> for ExecutedEntry {
    fn from(result: ExecutionResult) -> Self {
        Self {
            query: result.query,
            results: result.rows,
            row_count: result.row_count,
            message: result.message,
            formatted_table: result.formatted.formatted,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedEntry {
    pub query: String,
    pub error: String,
    pub code: ErrorCode,
}

impl From<StatementFailure> for FailedEntry {
    fn from(failure: StatementFailure) -> Self {
        Self {
            query: failure.query,
            error: failure.error,
            code: failure.code,
        }
    }
}

/// One statement of a batch: either its results or its error
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StatementEntry {
    Executed(ExecutedEntry),
    Failed(FailedEntry),
}

impl From<StatementOutcome> for StatementEntry {
    fn from(outcome: StatementOutcome) -> Self {
        match outcome {
            StatementOutcome::Executed(result) => StatementEntry::Executed(result.into()),
            StatementOutcome::Failed(failure) => StatementEntry::Failed(failure.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiStatementResponse {
    pub success: bool,
    pub query: String,
    pub is_multi_statement: bool,
    pub results: Vec<StatementEntry>,
    pub message: String,
}

/// Body of a successful execute call
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExecuteResponse {
    Single(SingleStatementResponse),
    Multi(MultiStatementResponse),
}

impl From<BatchResult> for ExecuteResponse {
    fn from(batch: BatchResult) -> Self {
        let BatchResult {
            query,
            is_multi_statement,
            mut results,
            message,
            success,
        } = batch;

        if !is_multi_statement && results.len() == 1 {
            if let Some(StatementOutcome::Executed(result)) = results.pop() {
                return ExecuteResponse::Single(SingleStatementResponse {
                    success,
                    query,
                    results: result.rows,
                    formatted_table: result.formatted.formatted,
                    message: result.message,
                    columns: result.formatted.column_info.into(),
                });
            }
        }

        ExecuteResponse::Multi(MultiStatementResponse {
            success,
            query,
            is_multi_statement: true,
            results: results.into_iter().map(StatementEntry::from).collect(),
            message,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllResponse {
    pub success: bool,
    pub message: String,
    pub tables_dropped: Vec<String>,
}

impl DeleteAllResponse {
    pub fn new(tables_dropped: Vec<String>) -> Self {
        Self {
            success: true,
            message: format!(
                "All tables deleted successfully. {} tables dropped.",
                tables_dropped.len()
            ),
            tables_dropped,
        }
    }
}

/// Body of every failed call
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: ErrorCode,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code,
        }
    }
}

impl From<&PlaygroundError> for ErrorResponse {
    fn from(err: &PlaygroundError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// HTTP status for each error kind.
///
/// Policy denials are 403; caller mistakes and engine rejections are 400;
/// materialization, upstream generation and internal failures are 500.
pub fn status_for(err: &PlaygroundError) -> StatusCode {
    match err {
        PlaygroundError::MalformedInput(_)
        | PlaygroundError::EmptyQuery(_)
        | PlaygroundError::InvalidConfirmation(_)
        | PlaygroundError::Execution(_) => StatusCode::BAD_REQUEST,
        PlaygroundError::PolicyViolation(_) => StatusCode::FORBIDDEN,
        PlaygroundError::Generation(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
        PlaygroundError::Generation(_)
        | PlaygroundError::Materialization(_)
        | PlaygroundError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: &PlaygroundError) -> HttpResponse {
    HttpResponse::build(status_for(err)).json(ErrorResponse::from(err))
}

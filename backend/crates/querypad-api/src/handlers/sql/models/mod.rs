mod sql_request;
mod sql_response;

pub use sql_request::{CsvAttachment, CsvDataPayload, DeleteAllRequest, ExecuteRequest, GenerateRequest};
pub use sql_response::{
    error_response, status_for, ColumnsPayload, DeleteAllResponse, ErrorResponse, ExecuteResponse,
    ExecutedEntry, FailedEntry, GenerateResponse, MultiStatementResponse, SingleStatementResponse,
    StatementEntry,
};

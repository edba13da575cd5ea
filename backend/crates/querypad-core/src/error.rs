// Error types module
use std::fmt;

use querypad_sql::PolicyViolation;
use serde::Serialize;
use thiserror::Error;

use crate::generation::GenerationError;

pub type Result<T> = std::result::Result<T, PlaygroundError>;

/// Main error type for the playground.
///
/// Every variant displays the user-facing message verbatim; engine and
/// validation messages are passed through unchanged.
#[derive(Error, Debug)]
pub enum PlaygroundError {
    /// CSV text or a CSV literal does not have the required shape
    #[error("{0}")]
    MalformedInput(String),

    /// Nothing left to run after cleanup and splitting
    #[error("{0}")]
    EmptyQuery(String),

    #[error(transparent)]
    PolicyViolation(#[from] PolicyViolation),

    /// Loading an uploaded CSV into its ephemeral table failed
    #[error("{0}")]
    Materialization(String),

    /// The engine rejected a statement
    #[error("{0}")]
    Execution(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("{0}")]
    InvalidConfirmation(String),

    #[error("{0}")]
    Internal(String),
}

impl PlaygroundError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PlaygroundError::MalformedInput(_) => ErrorCode::MalformedInput,
            PlaygroundError::EmptyQuery(_) => ErrorCode::EmptyQuery,
            PlaygroundError::PolicyViolation(_) => ErrorCode::PolicyViolation,
            PlaygroundError::Materialization(_) => ErrorCode::MaterializationError,
            PlaygroundError::Execution(_) => ErrorCode::ExecutionError,
            PlaygroundError::Generation(_) => ErrorCode::GenerationError,
            PlaygroundError::InvalidConfirmation(_) => ErrorCode::InvalidConfirmation,
            PlaygroundError::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub(crate) fn execution(err: rusqlite::Error) -> Self {
        PlaygroundError::Execution(err.to_string())
    }
}

/// Machine-readable error code carried next to every error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MalformedInput,
    EmptyQuery,
    PolicyViolation,
    MaterializationError,
    ExecutionError,
    GenerationError,
    InvalidConfirmation,
    InvalidRequest,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedInput => "MALFORMED_INPUT",
            ErrorCode::EmptyQuery => "EMPTY_QUERY",
            ErrorCode::PolicyViolation => "POLICY_VIOLATION",
            ErrorCode::MaterializationError => "MATERIALIZATION_ERROR",
            ErrorCode::ExecutionError => "EXECUTION_ERROR",
            ErrorCode::GenerationError => "GENERATION_ERROR",
            ErrorCode::InvalidConfirmation => "INVALID_CONFIRMATION",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querypad_sql::SafetyPolicy;

    #[test]
    fn policy_violation_keeps_reason_and_code() {
        let violation = SafetyPolicy::SharedDataset.check("drop table Books").unwrap_err();
        let err = PlaygroundError::from(violation);
        assert_eq!(err.to_string(), "Destructive operations not allowed in this demo");
        assert_eq!(err.code(), ErrorCode::PolicyViolation);
    }

    #[test]
    fn error_code_serializes_like_as_str() {
        for code in [
            ErrorCode::MalformedInput,
            ErrorCode::EmptyQuery,
            ErrorCode::PolicyViolation,
            ErrorCode::MaterializationError,
            ErrorCode::ExecutionError,
            ErrorCode::GenerationError,
            ErrorCode::InvalidConfirmation,
            ErrorCode::InvalidRequest,
            ErrorCode::InternalError,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn execution_message_is_verbatim() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.prepare("SELECT * FROM missing_table").unwrap_err();
        let err = PlaygroundError::execution(err);
        assert!(err.to_string().contains("no such table: missing_table"));
        assert_eq!(err.code(), ErrorCode::ExecutionError);
    }
}

//! Multi-statement batches.
//!
//! A single statement is all-or-nothing: a policy denial or engine error fails
//! the request. In a batch every statement is policed and executed on its own,
//! in source order, and failures are recorded inline while the rest of the
//! batch keeps running.

use std::time::Instant;

use querypad_sql::{split_and_classify, SafetyPolicy};
use rusqlite::Connection;

use crate::error::{ErrorCode, PlaygroundError, Result};
use crate::executor::{execute_statement, ExecutionResult};

/// A statement in a batch that was denied or failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFailure {
    pub query: String,
    pub error: String,
    pub code: ErrorCode,
}

#[derive(Debug, Clone)]
pub enum StatementOutcome {
    Executed(ExecutionResult),
    Failed(StatementFailure),
}

impl StatementOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, StatementOutcome::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    /// The submitted text the statements were split from
    pub query: String,
    pub is_multi_statement: bool,
    /// One entry per statement, in source order
    pub results: Vec<StatementOutcome>,
    pub message: String,
    pub success: bool,
}

impl BatchResult {
    /// The result of a single-statement request.
    pub fn single(&self) -> Option<&ExecutionResult> {
        match (self.is_multi_statement, self.results.first()) {
            (false, Some(StatementOutcome::Executed(result))) => Some(result),
            _ => None,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count()
    }
}

/// Split `raw`, police each statement with `policy`, and run them in order.
pub fn run_batch(conn: &Connection, raw: &str, policy: SafetyPolicy) -> Result<BatchResult> {
    let statements = split_and_classify(raw);
    if statements.is_empty() {
        return Err(PlaygroundError::EmptyQuery("No SQL statements to execute".to_string()));
    }

    let start = Instant::now();

    if statements.len() == 1 {
        let statement = &statements[0];
        policy.check(statement.text())?;
        let result = execute_statement(conn, statement)?;

        log::debug!(
            target: "sql::exec",
            "Single statement completed in {:.3}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );

        return Ok(BatchResult {
            query: raw.to_string(),
            is_multi_statement: false,
            message: result.message.clone(),
            results: vec![StatementOutcome::Executed(result)],
            success: true,
        });
    }

    let mut results = Vec::with_capacity(statements.len());
    let mut summary = Vec::with_capacity(statements.len());

    for (idx, statement) in statements.iter().enumerate() {
        let outcome = policy
            .check(statement.text())
            .map_err(PlaygroundError::from)
            .and_then(|_| execute_statement(conn, statement));

        match outcome {
            Ok(result) => {
                summary.push(result.batch_summary());
                results.push(StatementOutcome::Executed(result));
            },
            Err(err) => {
                log::debug!(
                    target: "sql::exec",
                    "Statement {} of {} failed: {}",
                    idx + 1,
                    statements.len(),
                    err
                );
                summary.push(format!("Statement {} failed: {}.", idx + 1, err));
                results.push(StatementOutcome::Failed(StatementFailure {
                    query: statement.text().to_string(),
                    error: err.to_string(),
                    code: err.code(),
                }));
            },
        }
    }

    let batch = BatchResult {
        query: raw.to_string(),
        is_multi_statement: true,
        results,
        message: summary.join(" "),
        success: true,
    };

    log::debug!(
        target: "sql::exec",
        "Batch of {} statement(s) completed in {:.3}ms ({} failed)",
        statements.len(),
        start.elapsed().as_secs_f64() * 1000.0,
        batch.failed_count()
    );

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SharedDataset;
    use serde_json::json;

    fn run_seeded(sql: &str) -> Result<BatchResult> {
        let dataset = SharedDataset::seeded().unwrap();
        dataset.with_connection(|conn| run_batch(conn, sql, SafetyPolicy::SharedDataset))
    }

    #[test]
    fn empty_submission_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        for sql in ["", "   ", ";;", "-- nothing"] {
            let err = run_batch(&conn, sql, SafetyPolicy::SharedDataset).unwrap_err();
            assert!(matches!(err, PlaygroundError::EmptyQuery(_)), "{:?}", sql);
        }
    }

    #[test]
    fn single_statement_is_inlined() {
        let batch = run_seeded("SELECT Title FROM Books ORDER BY BookID").unwrap();
        assert!(!batch.is_multi_statement);
        let result = batch.single().unwrap();
        assert_eq!(result.row_count, 3);
        assert_eq!(batch.message, "Query executed successfully. 3 row(s) returned.");
    }

    #[test]
    fn single_denied_statement_is_fatal() {
        let err = run_seeded("DROP TABLE Books").unwrap_err();
        assert!(matches!(err, PlaygroundError::PolicyViolation(_)));
    }

    #[test]
    fn single_engine_error_is_fatal() {
        let err = run_seeded("SELECT * FROM Missing").unwrap_err();
        assert!(matches!(err, PlaygroundError::Execution(_)));
    }

    #[test]
    fn denied_statement_does_not_abort_batch() {
        let batch =
            run_seeded("SELECT Title FROM Books; DROP TABLE Books; SELECT COUNT(*) AS n FROM Books").unwrap();

        assert!(batch.is_multi_statement);
        assert!(batch.success);
        assert_eq!(batch.results.len(), 3);
        assert_eq!(batch.failed_count(), 1);

        match &batch.results[1] {
            StatementOutcome::Failed(failure) => {
                assert_eq!(failure.query, "DROP TABLE Books");
                assert_eq!(failure.code, ErrorCode::PolicyViolation);
                assert_eq!(failure.error, "Destructive operations not allowed in this demo");
            },
            other => panic!("expected failure, got {:?}", other),
        }
        match &batch.results[2] {
            StatementOutcome::Executed(result) => {
                assert_eq!(serde_json::Value::Object(result.rows[0].clone()), json!({"n": 3}));
            },
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn later_statements_see_earlier_effects() {
        let batch = run_seeded(
            "CREATE TABLE notes (body TEXT); INSERT INTO notes VALUES ('a'), ('b'); SELECT * FROM notes",
        )
        .unwrap();

        assert_eq!(batch.failed_count(), 0);
        assert_eq!(
            batch.message,
            "CREATE statement executed successfully. \
             INSERT statement executed successfully. 2 row(s) affected. \
             SELECT query executed successfully. 2 row(s) returned."
        );
    }

    #[test]
    fn engine_error_is_recorded_and_batch_continues() {
        let batch = run_seeded("SELECT * FROM Missing; SELECT 1 AS one").unwrap();

        assert!(batch.success);
        assert!(batch.results[0].is_error());
        assert!(!batch.results[1].is_error());
        assert!(batch.message.starts_with("Statement 1 failed: no such table: Missing."));
        assert!(batch.message.ends_with("SELECT query executed successfully. 1 row(s) returned."));
    }

    #[test]
    fn uploaded_csv_policy_allows_delete() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE uploaded_csv (a TEXT); INSERT INTO uploaded_csv VALUES ('x');")
            .unwrap();

        let batch = run_batch(&conn, "DELETE FROM uploaded_csv; SELECT * FROM uploaded_csv", SafetyPolicy::UploadedCsv)
            .unwrap();
        assert_eq!(batch.failed_count(), 0);

        let err = run_batch(&conn, "DROP TABLE uploaded_csv", SafetyPolicy::UploadedCsv).unwrap_err();
        assert_eq!(err.to_string(), "Dropping the uploaded CSV table is not allowed");
    }
}

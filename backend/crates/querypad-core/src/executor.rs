//! Single-statement execution against a SQLite connection.
//!
//! The statement kind picks the strategy: selects return their rows, mutations
//! report affected rows, everything else runs for its side effect. Results of
//! every kind carry rows (real or synthetic) and a formatted table so callers
//! can present them uniformly.

use base64::Engine as _;
use querypad_sql::{Statement, StatementKind};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::{Map, Value};

use crate::error::{PlaygroundError, Result};
use crate::format::{format_table, FormattedTable};

/// One result row; keys are in column order.
pub type Row = Map<String, Value>;

const PREVIEW_CHARS: usize = 120;

/// Outcome of one executed statement.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Statement text as executed
    pub query: String,
    pub kind: StatementKind,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Returned rows for selects, affected rows for mutations, 0 otherwise
    pub row_count: usize,
    pub message: String,
    pub formatted: FormattedTable,
}

impl ExecutionResult {
    fn new(statement: &Statement, columns: Vec<String>, rows: Vec<Row>, row_count: usize, message: String) -> Self {
        let formatted = format_table(&columns, &rows);
        Self {
            query: statement.text().to_string(),
            kind: statement.kind(),
            columns,
            rows,
            row_count,
            message,
            formatted,
        }
    }

    /// Message fragment used when this statement is part of a batch.
    pub fn batch_summary(&self) -> String {
        match self.kind {
            StatementKind::Select => {
                format!("SELECT query executed successfully. {} row(s) returned.", self.row_count)
            },
            StatementKind::Mutate(verb) => format!(
                "{} statement executed successfully. {} row(s) affected.",
                verb.as_str(),
                self.row_count
            ),
            StatementKind::Ddl(verb) => format!("{} statement executed successfully.", verb.as_str()),
            StatementKind::Other => "Statement executed successfully.".to_string(),
        }
    }
}

/// Execute one classified statement.
///
/// Engine errors come back as [`PlaygroundError::Execution`] with the engine's
/// message unchanged.
pub fn execute_statement(conn: &Connection, statement: &Statement) -> Result<ExecutionResult> {
    log::debug!(
        target: "sql::exec",
        "Executing {} statement: {}",
        statement.kind(),
        sql_preview(statement.text())
    );

    let result = match statement.kind() {
        StatementKind::Select => run_select(conn, statement),
        StatementKind::Mutate(verb) => {
            let affected = run_to_completion(conn, statement.text())
                .map(|_| conn.changes() as usize)
                .map_err(PlaygroundError::execution)?;
            let mut row = Row::new();
            row.insert("operation".to_string(), Value::from(verb.as_str()));
            row.insert("rowsAffected".to_string(), Value::from(affected));
            Ok(ExecutionResult::new(
                statement,
                vec!["operation".to_string(), "rowsAffected".to_string()],
                vec![row],
                affected,
                format!("Query executed successfully. {} row(s) affected.", affected),
            ))
        },
        StatementKind::Ddl(verb) => {
            run_to_completion(conn, statement.text()).map_err(PlaygroundError::execution)?;
            let mut row = Row::new();
            row.insert("operation".to_string(), Value::from(verb.as_str()));
            row.insert("result".to_string(), Value::from("Success"));
            Ok(ExecutionResult::new(
                statement,
                vec!["operation".to_string(), "result".to_string()],
                vec![row],
                0,
                format!("{} statement executed successfully.", verb.as_str()),
            ))
        },
        StatementKind::Other => {
            run_to_completion(conn, statement.text()).map_err(PlaygroundError::execution)?;
            let mut row = Row::new();
            row.insert("result".to_string(), Value::from("Success"));
            Ok(ExecutionResult::new(
                statement,
                vec!["result".to_string()],
                vec![row],
                0,
                "Query executed successfully.".to_string(),
            ))
        },
    };

    if let Err(e) = &result {
        log::debug!(target: "sql::exec", "Statement failed: {}", e);
    }
    result
}

fn run_select(conn: &Connection, statement: &Statement) -> Result<ExecutionResult> {
    let mut stmt = conn.prepare(statement.text()).map_err(PlaygroundError::execution)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = Vec::new();
    let mut cursor = stmt.raw_query();
    while let Some(row) = cursor.next().map_err(PlaygroundError::execution)? {
        let mut record = Row::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            record.insert(name.clone(), sqlite_value_to_json(row, idx));
        }
        rows.push(record);
    }

    let count = rows.len();
    let message = if count == 0 {
        "Query executed successfully. No rows returned.".to_string()
    } else {
        format!("Query executed successfully. {} row(s) returned.", count)
    };
    Ok(ExecutionResult::new(statement, columns, rows, count, message))
}

/// Step a statement until it is done, discarding any rows it yields
/// (`INSERT ... RETURNING`, some `PRAGMA`s).
fn run_to_completion(conn: &Connection, sql: &str) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.raw_query();
    while rows.next()?.is_some() {}
    Ok(())
}

/// Map an engine value to JSON, keeping its native type.
///
/// Non-finite reals become `null`; blobs become base64 text.
pub fn sqlite_value_to_json(row: &rusqlite::Row<'_>, idx: usize) -> Value {
    match row.get_ref(idx) {
        Ok(ValueRef::Null) => Value::Null,
        Ok(ValueRef::Integer(i)) => Value::Number(i.into()),
        Ok(ValueRef::Real(f)) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Ok(ValueRef::Text(bytes)) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        Ok(ValueRef::Blob(bytes)) => Value::String(base64::engine::general_purpose::STANDARD.encode(bytes)),
        Err(_) => Value::Null,
    }
}

/// First characters of a statement on one line, for logs.
pub fn sql_preview(sql: &str) -> String {
    let flat: String = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

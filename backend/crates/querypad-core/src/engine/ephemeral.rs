use rusqlite::{params_from_iter, Connection};

use super::quote_identifier;
use crate::csv::ParsedTable;
use crate::error::{PlaygroundError, Result};

/// Name of the table an uploaded CSV is materialized into.
pub const UPLOADED_TABLE: &str = "uploaded_csv";

/// A private in-memory database holding one uploaded CSV as [`UPLOADED_TABLE`].
///
/// Owned by exactly one request. Dropping the handle closes the database, so
/// every exit path releases it; [`EphemeralEngine::close`] does the same but
/// logs a failed close.
#[derive(Debug)]
pub struct EphemeralEngine {
    conn: Connection,
}

impl EphemeralEngine {
    /// Create a fresh database and load `table` into it.
    ///
    /// Every column is `TEXT`. Rows go through one prepared, parameterized
    /// INSERT inside a single transaction, so a failure leaves nothing behind:
    /// the half-built database is dropped and the error is returned.
    pub fn materialize(table: &ParsedTable) -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|e| {
            PlaygroundError::Materialization(format!("Failed to create CSV database: {}", e))
        })?;

        load_table(&mut conn, table).map_err(|e| {
            log::warn!(target: "csv::materialize", "CSV materialization failed: {}", e);
            PlaygroundError::Materialization(format!("Failed to load CSV data: {}", e))
        })?;

        log::debug!(
            target: "csv::materialize",
            "Materialized {} row(s) x {} column(s) into {}",
            table.row_count(),
            table.column_count(),
            UPLOADED_TABLE
        );

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn close(self) {
        if let Err((_, e)) = self.conn.close() {
            log::warn!(target: "csv::materialize", "Failed to close CSV database: {}", e);
        }
    }
}

fn load_table(conn: &mut Connection, table: &ParsedTable) -> rusqlite::Result<()> {
    let columns: Vec<String> = table
        .headers()
        .iter()
        .map(|header| format!("{} TEXT", quote_identifier(header)))
        .collect();
    conn.execute_batch(&format!("CREATE TABLE {} ({})", UPLOADED_TABLE, columns.join(", ")))?;

    let placeholders = vec!["?"; table.column_count()].join(", ");
    let insert_sql = format!("INSERT INTO {} VALUES ({})", UPLOADED_TABLE, placeholders);

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&insert_sql)?;
        for row in table.rows() {
            stmt.execute(params_from_iter(row.iter()))?;
        }
    }
    tx.commit()
}

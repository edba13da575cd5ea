use parking_lot::Mutex;
use querypad_configs::DatasetSettings;
use rusqlite::Connection;

use super::{quote_identifier, SEED_SQL};
use crate::error::{PlaygroundError, Result};

const LIST_TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'";

/// The process-wide in-memory dataset every non-CSV request runs against.
///
/// One connection, serialized by a mutex: statements from concurrent requests
/// never run at the same time, but a batch from one request may still see rows
/// written by another request between two of its statements.
pub struct SharedDataset {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SharedDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDataset").field("conn", &"Mutex<Connection>").finish()
    }
}

impl SharedDataset {
    /// Empty in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| PlaygroundError::Internal(format!("Failed to open database: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database loaded with the demo schema and sample rows.
    pub fn seeded() -> Result<Self> {
        let dataset = Self::open_in_memory()?;
        dataset
            .conn
            .lock()
            .execute_batch(SEED_SQL)
            .map_err(|e| PlaygroundError::Internal(format!("Failed to seed database: {}", e)))?;
        Ok(dataset)
    }

    pub fn from_settings(settings: &DatasetSettings) -> Result<Self> {
        if settings.seed {
            Self::seeded()
        } else {
            Self::open_in_memory()
        }
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_connection<T>(&self, f: impl FnOnce(&mut Connection) -> T) -> T {
        let mut conn = self.conn.lock();
        f(&mut conn)
    }

    /// Run `f` with exclusive access, then roll back any transaction it left open.
    ///
    /// User SQL goes through here: a `BEGIN` with no matching `COMMIT` must not
    /// carry over into the next request.
    pub fn with_autocommit<T>(&self, f: impl FnOnce(&mut Connection) -> T) -> T {
        self.with_connection(|conn| {
            let out = f(conn);
            if !conn.is_autocommit() {
                log::warn!(
                    target: "sql::exec",
                    "Rolling back a transaction left open on the shared dataset"
                );
                if let Err(e) = conn.execute_batch("ROLLBACK") {
                    log::error!(target: "sql::exec", "Rollback of open transaction failed: {}", e);
                }
            }
            out
        })
    }

    /// User tables in creation order (engine-internal `sqlite_*` tables excluded).
    pub fn table_names(&self) -> Result<Vec<String>> {
        self.with_connection(|conn| list_tables(conn))
            .map_err(|e| PlaygroundError::Internal(e.to_string()))
    }

    /// Drop every user table inside one transaction.
    ///
    /// Either every table is dropped or, on the first failure, the transaction
    /// rolls back and the schema is left untouched. Returns the dropped names.
    pub fn delete_all_tables(&self) -> Result<Vec<String>> {
        self.with_connection(|conn| -> rusqlite::Result<Vec<String>> {
            let tables = list_tables(conn)?;
            let tx = conn.transaction()?;
            for table in &tables {
                tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_identifier(table)))?;
            }
            tx.commit()?;
            Ok(tables)
        })
        .map_err(|e| PlaygroundError::Internal(e.to_string()))
    }
}

fn list_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(LIST_TABLES_SQL)?;
    let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
    names.collect()
}

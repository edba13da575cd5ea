//! AppContext for QueryPad
//!
//! Holds the long-lived resources every request needs: the shared dataset and
//! the SQL generator. Built once at startup and handed to the HTTP layer, so
//! tests can assemble their own with an empty dataset or a stub generator.

use std::sync::Arc;

use querypad_sql::{clean_sql_query, SafetyPolicy};

use crate::csv::ParsedTable;
use crate::engine::{EphemeralEngine, SharedDataset};
use crate::error::{PlaygroundError, Result};
use crate::executor::sql_preview;
use crate::generation::{build_prompt, GenerationError, SchemaContext, SqlGenerator};
use crate::orchestrator::{run_batch, BatchResult};

/// Token that must accompany a delete-all request.
pub const DELETE_CONFIRMATION: &str = "CONFIRM_DELETE";

pub struct AppContext {
    shared: Arc<SharedDataset>,
    generator: Arc<dyn SqlGenerator>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("shared", &self.shared)
            .field("generator", &"Arc<dyn SqlGenerator>")
            .finish()
    }
}

impl AppContext {
    pub fn new(shared: Arc<SharedDataset>, generator: Arc<dyn SqlGenerator>) -> Self {
        Self { shared, generator }
    }

    pub fn shared_dataset(&self) -> &Arc<SharedDataset> {
        &self.shared
    }

    /// Run a submission against the shared dataset.
    ///
    /// Blocks on the engine; call from a blocking context.
    pub fn execute(&self, query: &str) -> Result<BatchResult> {
        let cleaned = clean_sql_query(query);
        log::info!(target: "sql::exec", "Executing on shared dataset: {}", sql_preview(&cleaned));
        self.shared
            .with_autocommit(|conn| run_batch(conn, &cleaned, SafetyPolicy::SharedDataset))
    }

    /// Run a submission against a private database built from `table`.
    ///
    /// The database lives for this call only and is released on every path.
    pub fn execute_csv(&self, table: &ParsedTable, query: &str) -> Result<BatchResult> {
        let cleaned = clean_sql_query(query);
        if cleaned.is_empty() {
            return Err(PlaygroundError::EmptyQuery("No SQL statements to execute".to_string()));
        }

        log::info!(
            target: "sql::exec",
            "Executing on uploaded CSV ({} rows): {}",
            table.row_count(),
            sql_preview(&cleaned)
        );

        let engine = EphemeralEngine::materialize(table)?;
        let result = run_batch(engine.connection(), &cleaned, SafetyPolicy::UploadedCsv);
        engine.close();
        result
    }

    /// Generate SQL for `prompt`, against the uploaded CSV when one is given.
    ///
    /// The model output goes through the same cleanup as submitted queries.
    pub async fn generate(
        &self,
        prompt: &str,
        csv: Option<&ParsedTable>,
        filename: Option<&str>,
    ) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt.into());
        }

        let context = match csv {
            Some(table) => SchemaContext::UploadedCsv {
                columns: table.headers(),
                filename,
            },
            None => SchemaContext::SeededDataset,
        };
        let full_prompt = build_prompt(&context, prompt);

        let raw = self.generator.generate(&full_prompt).await?;
        let cleaned = clean_sql_query(&raw);
        if cleaned.is_empty() {
            return Err(GenerationError::EmptyResponse.into());
        }

        log::info!(target: "generation", "Generated SQL: {}", sql_preview(&cleaned));
        Ok(cleaned)
    }

    /// Drop every table in the shared dataset.
    ///
    /// Does nothing unless `confirmation` is exactly [`DELETE_CONFIRMATION`].
    pub fn delete_all_tables(&self, confirmation: &str) -> Result<Vec<String>> {
        if confirmation != DELETE_CONFIRMATION {
            return Err(PlaygroundError::InvalidConfirmation(format!(
                "Confirmation required. Please provide '{}' in the confirmation field.",
                DELETE_CONFIRMATION
            )));
        }

        let dropped = self.shared.delete_all_tables()?;
        log::warn!(target: "sql::exec", "Dropped {} table(s) from the shared dataset", dropped.len());
        Ok(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_csv;
    use crate::orchestrator::StatementOutcome;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    /// Returns a canned response and remembers the prompt it was given.
    struct StubGenerator {
        response: String,
        last_prompt: Mutex<Option<String>>,
    }

    impl StubGenerator {
        fn new(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: response.to_string(),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl SqlGenerator for StubGenerator {
        async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
            *self.last_prompt.lock() = Some(prompt.to_string());
            Ok(self.response.clone())
        }
    }

    fn context_with(generator: Arc<dyn SqlGenerator>) -> AppContext {
        AppContext::new(Arc::new(SharedDataset::seeded().unwrap()), generator)
    }

    fn context() -> AppContext {
        context_with(StubGenerator::new("SELECT 1;"))
    }

    #[test]
    fn execute_cleans_before_running() {
        let ctx = context();
        let batch = ctx.execute("```sql\n-- count books\nSELECT COUNT(*) AS n FROM Books;\n```").unwrap();
        let result = batch.single().unwrap();
        assert_eq!(serde_json::Value::Object(result.rows[0].clone()), json!({"n": 3}));
        assert_eq!(batch.query, "SELECT COUNT(*) AS n FROM Books;");
    }

    #[test]
    fn execute_sees_null_values() {
        let ctx = context();
        let batch = ctx.execute("SELECT LoanID, ReturnDate FROM Loans ORDER BY LoanID").unwrap();
        let result = batch.single().unwrap();
        assert_eq!(result.rows[1]["ReturnDate"], serde_json::Value::Null);
        assert!(result.formatted.formatted.contains("NULL"));
    }

    #[test]
    fn execute_csv_returns_uploaded_rows() {
        let ctx = context();
        let table = parse_csv("Name,Age\nAnn,30").unwrap();
        let batch = ctx.execute_csv(&table, "SELECT * FROM uploaded_csv").unwrap();

        let result = batch.single().unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(serde_json::Value::Object(result.rows[0].clone()), json!({"Name": "Ann", "Age": "30"}));
    }

    #[test]
    fn execute_csv_never_touches_shared_dataset() {
        let ctx = context();
        let table = parse_csv("Name\nAnn").unwrap();
        let batch = ctx
            .execute_csv(&table, "CREATE TABLE scratch (a); SELECT * FROM Books")
            .unwrap();

        assert!(!batch.results[0].is_error());
        assert!(matches!(&batch.results[1], StatementOutcome::Failed(f) if f.error.contains("no such table: Books")));
        assert!(!ctx.shared_dataset().table_names().unwrap().contains(&"scratch".to_string()));
    }

    #[test]
    fn execute_csv_rejects_empty_query() {
        let ctx = context();
        let table = parse_csv("a\n1").unwrap();
        assert!(matches!(ctx.execute_csv(&table, "  \n"), Err(PlaygroundError::EmptyQuery(_))));
    }

    #[test]
    fn delete_all_requires_exact_token() {
        let ctx = context();
        for token in ["", "confirm_delete", "CONFIRM_DELETE "] {
            let err = ctx.delete_all_tables(token).unwrap_err();
            assert!(matches!(err, PlaygroundError::InvalidConfirmation(_)));
        }
        assert!(!ctx.shared_dataset().table_names().unwrap().is_empty());

        let dropped = ctx.delete_all_tables(DELETE_CONFIRMATION).unwrap();
        assert_eq!(dropped.len(), 8);
        assert!(ctx.shared_dataset().table_names().unwrap().is_empty());
    }

    #[test]
    fn spaced_destructive_statements_are_denied() {
        let ctx = context();
        for sql in ["DROP  TABLE Loans", "DELETE\tFROM Patrons", "drop/**/table Books"] {
            let err = ctx.execute(sql).unwrap_err();
            assert!(matches!(err, PlaygroundError::PolicyViolation(_)), "{sql:?}: {err:?}");
        }

        let tables = ctx.shared_dataset().table_names().unwrap();
        assert!(tables.iter().any(|t| t == "Loans"));
        let patrons = ctx.execute("SELECT COUNT(*) AS n FROM Patrons").unwrap();
        assert_eq!(patrons.single().unwrap().rows[0]["n"], json!(2));
    }

    #[test]
    fn unterminated_begin_does_not_leak_into_later_requests() {
        let ctx = context();
        ctx.execute("BEGIN").unwrap();
        ctx.execute("INSERT INTO Genres (GenreName) VALUES ('Poetry')").unwrap();

        let genres = ctx.execute("SELECT COUNT(*) AS n FROM Genres").unwrap();
        assert_eq!(genres.single().unwrap().rows[0]["n"], json!(4));

        let dropped = ctx.delete_all_tables(DELETE_CONFIRMATION).unwrap();
        assert_eq!(dropped.len(), 8);
    }

    #[test]
    fn committed_batch_transaction_is_kept() {
        let ctx = context();
        let batch = ctx
            .execute("BEGIN; INSERT INTO Genres (GenreName) VALUES ('Poetry'); COMMIT")
            .unwrap();
        assert_eq!(batch.failed_count(), 0);

        let genres = ctx.execute("SELECT COUNT(*) AS n FROM Genres").unwrap();
        assert_eq!(genres.single().unwrap().rows[0]["n"], json!(4));
    }

    #[test]
    fn execute_csv_surfaces_materialization_failure() {
        let ctx = context();
        let headers: Vec<String> = (0..3000).map(|i| format!("c{}", i)).collect();
        let values = vec!["1"; headers.len()].join(",");
        let table = parse_csv(&format!("{}\n{}", headers.join(","), values)).unwrap();

        let err = ctx.execute_csv(&table, "SELECT * FROM uploaded_csv").unwrap_err();
        assert!(matches!(err, PlaygroundError::Materialization(_)), "{err:?}");
        assert!(err.to_string().starts_with("Failed to load CSV data"));
    }

    #[tokio::test]
    async fn generate_cleans_model_output() {
        let ctx = context_with(StubGenerator::new("```sql\nSELECT Title FROM Books;\n```"));
        let sql = ctx.generate("list titles", None, None).await.unwrap();
        assert_eq!(sql, "SELECT Title FROM Books;");
    }

    #[tokio::test]
    async fn generate_uses_csv_schema() {
        let stub = StubGenerator::new("SELECT * FROM uploaded_csv");
        let ctx = context_with(stub.clone());
        let table = parse_csv("Name,Age\nAnn,30").unwrap();

        ctx.generate("everyone", Some(&table), Some("people.csv")).await.unwrap();

        let prompt = stub.last_prompt.lock().clone().unwrap();
        assert!(prompt.contains("uploaded_csv"));
        assert!(prompt.contains("\"Age\""));
    }

    #[tokio::test]
    async fn generate_rejects_blank_prompt_before_calling_model() {
        let stub = StubGenerator::new("SELECT 1");
        let ctx = context_with(stub.clone());

        let err = ctx.generate("   ", None, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing prompt in request body");
        assert!(stub.last_prompt.lock().is_none());
    }

    #[tokio::test]
    async fn generate_rejects_empty_model_output() {
        let ctx = context_with(StubGenerator::new("```sql\n-- nothing to see\n```"));
        let err = ctx.generate("anything", None, None).await.unwrap_err();
        assert!(matches!(err, PlaygroundError::Generation(GenerationError::EmptyResponse)));
    }
}

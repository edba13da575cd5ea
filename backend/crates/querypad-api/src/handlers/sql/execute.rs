//! SQL execution handlers for `/api/execute-sql` and `/api/execute-csv-sql`

use std::sync::Arc;
use std::time::Instant;

use actix_web::{post, web, HttpResponse, Responder};
use querypad_core::{AppContext, PlaygroundError};

use super::models::{error_response, ExecuteRequest, ExecuteResponse};

/// POST /api/execute-sql
///
/// Runs against the shared dataset, or against a private copy of the attached
/// CSV when `csvData`/`csvText` is present.
#[post("/execute-sql")]
pub async fn execute_sql(
    body: web::Json<ExecuteRequest>,
    app_context: web::Data<Arc<AppContext>>,
) -> impl Responder {
    run_execute(body.into_inner(), app_context.get_ref().clone(), false).await
}

/// POST /api/execute-csv-sql
///
/// Same as `/api/execute-sql` but an attached CSV is required.
#[post("/execute-csv-sql")]
pub async fn execute_csv_sql(
    body: web::Json<ExecuteRequest>,
    app_context: web::Data<Arc<AppContext>>,
) -> impl Responder {
    run_execute(body.into_inner(), app_context.get_ref().clone(), true).await
}

async fn run_execute(req: ExecuteRequest, app_context: Arc<AppContext>, require_csv: bool) -> HttpResponse {
    let start_time = Instant::now();

    let query = match req.query {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return error_response(&PlaygroundError::EmptyQuery(
                "Missing query in request body".to_string(),
            ))
        },
    };

    if require_csv && !req.csv.is_present() {
        return error_response(&PlaygroundError::MalformedInput(
            "Missing CSV data in request body. Please upload a CSV file first".to_string(),
        ));
    }

    let csv = req.csv;
    let outcome = web::block(move || match csv.into_table()? {
        Some(table) => app_context.execute_csv(&table, &query),
        None => app_context.execute(&query),
    })
    .await;

    let took = start_time.elapsed().as_secs_f64() * 1000.0;
    match outcome {
        Ok(Ok(batch)) => {
            log::debug!(
                target: "sql::exec",
                "Request completed in {:.3}ms ({} statement(s))",
                took,
                batch.results.len()
            );
            HttpResponse::Ok().json(ExecuteResponse::from(batch))
        },
        Ok(Err(err)) => {
            log::warn!(target: "sql::exec", "Execution failed after {:.3}ms: {}", took, err);
            error_response(&err)
        },
        Err(err) => {
            log::error!(target: "sql::exec", "Execution task failed: {}", err);
            error_response(&PlaygroundError::Internal(format!("Execution task failed: {}", err)))
        },
    }
}

//! Natural-language to SQL handlers

use std::sync::Arc;

use actix_web::{post, web, HttpResponse, Responder};
use querypad_core::{AppContext, PlaygroundError};

use super::models::{error_response, GenerateRequest, GenerateResponse};

/// POST /api/generate-sql
#[post("/generate-sql")]
pub async fn generate_sql(
    body: web::Json<GenerateRequest>,
    app_context: web::Data<Arc<AppContext>>,
) -> impl Responder {
    run_generate(body.into_inner(), app_context.get_ref(), false).await
}

/// POST /api/generate-csv-sql
///
/// The prompt is built from the attached CSV's columns instead of the seeded schema.
#[post("/generate-csv-sql")]
pub async fn generate_csv_sql(
    body: web::Json<GenerateRequest>,
    app_context: web::Data<Arc<AppContext>>,
) -> impl Responder {
    run_generate(body.into_inner(), app_context.get_ref(), true).await
}

async fn run_generate(req: GenerateRequest, app_context: &AppContext, require_csv: bool) -> HttpResponse {
    if require_csv && !req.csv.is_present() {
        return error_response(&PlaygroundError::MalformedInput(
            "Missing CSV data in request body. Please upload a CSV file first".to_string(),
        ));
    }

    let prompt = req.prompt.unwrap_or_default();
    let filename = req.csv.filename.clone();
    let table = match req.csv.into_table() {
        Ok(table) => table,
        Err(err) => return error_response(&err),
    };

    match app_context.generate(&prompt, table.as_ref(), filename.as_deref()).await {
        Ok(query) => HttpResponse::Ok().json(GenerateResponse {
            success: true,
            query,
        }),
        Err(err) => {
            if let PlaygroundError::Generation(inner) = &err {
                log::warn!(target: "generation", "SQL generation failed: {:?}", inner);
            }
            error_response(&err)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use querypad_core::{GenerationError, SharedDataset, SqlGenerator};
    use serde_json::{json, Value};

    struct FencedGenerator;

    #[async_trait]
    impl SqlGenerator for FencedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            if prompt.contains("uploaded_csv") {
                Ok("```sql\nSELECT * FROM uploaded_csv;\n```".to_string())
            } else {
                Ok("```sql\nSELECT * FROM Books;\n```".to_string())
            }
        }
    }

    fn app_data() -> web::Data<Arc<AppContext>> {
        let ctx = AppContext::new(Arc::new(SharedDataset::open_in_memory().unwrap()), Arc::new(FencedGenerator));
        web::Data::new(Arc::new(ctx))
    }

    #[actix_web::test]
    async fn test_generate_sql_cleans_output() {
        let app = test::init_service(App::new().app_data(app_data()).service(generate_sql)).await;
        let req = test::TestRequest::post()
            .uri("/generate-sql")
            .set_json(json!({"prompt": "all books"}))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"success": true, "query": "SELECT * FROM Books;"}));
    }

    #[actix_web::test]
    async fn test_generate_csv_sql_uses_csv_schema() {
        let app = test::init_service(App::new().app_data(app_data()).service(generate_csv_sql)).await;
        let req = test::TestRequest::post()
            .uri("/generate-csv-sql")
            .set_json(json!({"prompt": "everything", "csvText": "a,b\n1,2", "filename": "x.csv"}))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["query"], "SELECT * FROM uploaded_csv;");
    }

    #[actix_web::test]
    async fn test_generate_sql_missing_prompt() {
        let app = test::init_service(App::new().app_data(app_data()).service(generate_sql)).await;
        let req = test::TestRequest::post().uri("/generate-sql").set_json(json!({})).to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing prompt in request body");
        assert_eq!(body["code"], "GENERATION_ERROR");
    }
}

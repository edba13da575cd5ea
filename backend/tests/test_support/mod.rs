//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use querypad_core::{AppContext, GenerationError, SharedDataset, SqlGenerator};
use std::sync::Arc;

/// Echoes a fixed, fenced query so cleanup is exercised end to end.
pub struct CannedGenerator {
    pub response: String,
}

#[async_trait]
impl SqlGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.response.clone())
    }
}

pub fn seeded_context() -> Arc<AppContext> {
    context_with(SharedDataset::seeded().expect("seed dataset"), "```sql\nSELECT * FROM Books;\n```")
}

pub fn context_with(dataset: SharedDataset, canned: &str) -> Arc<AppContext> {
    let generator = CannedGenerator {
        response: canned.to_string(),
    };
    Arc::new(AppContext::new(Arc::new(dataset), Arc::new(generator)))
}

/// Build an in-process service with the same routes and JSON limits as the server.
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx))
                .app_data(querypad_api::json_config(1024 * 1024))
                .configure(querypad_api::configure_routes),
        )
        .await
    };
}

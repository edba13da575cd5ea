//! Natural-language to SQL generation.
//!
//! The core only knows the [`SqlGenerator`] capability: prompt text in, SQL
//! text out. [`GeminiGenerator`] implements it against the Generative Language
//! REST API; tests plug in their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use querypad_configs::GenerationSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{quote_identifier, UPLOADED_TABLE};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Missing prompt in request body")]
    EmptyPrompt,

    #[error("SQL generation is not configured (set GEMINI_API_KEY)")]
    NotConfigured,

    /// Transport or upstream failure; the detail is logged, not shown.
    #[error("Failed to generate SQL query")]
    Upstream(String),

    #[error("Failed to generate SQL query: the model returned no SQL")]
    EmptyResponse,
}

impl GenerationError {
    /// Whether the caller, not the upstream service, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GenerationError::EmptyPrompt)
    }
}

/// Turns a fully assembled prompt into raw model output.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// The schema a request is asking about.
#[derive(Debug, Clone, Copy)]
pub enum SchemaContext<'a> {
    SeededDataset,
    UploadedCsv {
        columns: &'a [String],
        filename: Option<&'a str>,
    },
}

const SEEDED_SCHEMA: &str = "\
- Authors (AuthorID, FirstName, LastName)
- Genres (GenreID, GenreName)
- Publishers (PublisherID, PublisherName)
- Books (BookID, Title, AuthorID, GenreID, PublisherID, PublicationYear, ISBN)
- Patrons (PatronID, FirstName, LastName, Address, PhoneNumber, Email)
- Loans (LoanID, BookID, PatronID, LoanDate, DueDate, ReturnDate)

There's also a customers (id, name, email, total_spent, join_date) and orders (id, customer_id, order_date, amount) table, but focus on the tables above for library-related queries.";

/// Assemble the full prompt sent to the model.
pub fn build_prompt(context: &SchemaContext<'_>, request: &str) -> String {
    let schema = match context {
        SchemaContext::SeededDataset => SEEDED_SCHEMA.to_string(),
        SchemaContext::UploadedCsv { columns, filename } => {
            let source = filename.map(|f| format!(" (loaded from '{}')", f)).unwrap_or_default();
            let listed: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();
            format!(
                "- {}{} ({})\n\nEvery column is stored as TEXT. Use CAST(... AS REAL) or CAST(... AS INTEGER) for numeric comparisons and sorting. Quote column names with double quotes.",
                UPLOADED_TABLE,
                source,
                listed.join(", ")
            )
        },
    };

    format!(
        "You are a SQLITE expert. Convert the following natural language request into a valid SQLITE query.\n\
         Only return the SQLITE query without any additional explanation or markdown.\n\n\
         Do not include backticks, SQLITE comments, or markdown formatting.\n\n\
         The database has the following schema:\n\n\
         {}\n\n\
         Request: {}\n",
        schema,
        request.trim()
    )
}

/// [`SqlGenerator`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl GeminiGenerator {
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Upstream(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<PartOut<'a>>,
}

#[derive(Debug, Serialize)]
struct PartOut<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartIn>,
}

#[derive(Debug, Deserialize)]
struct PartIn {
    text: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[async_trait]
impl SqlGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::NotConfigured)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![PartOut { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!(target: "generation", "Gemini request failed: {}", e);
                GenerationError::Upstream(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            log::error!(target: "generation", "Gemini returned {}: {}", status, detail);
            return Err(GenerationError::Upstream(format!("HTTP {}", status)));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            log::error!(target: "generation", "Invalid Gemini response: {}", e);
            GenerationError::Upstream(e.to_string())
        })?;

        extract_text(parsed)
    }
}

//! Request bodies for the SQL endpoints

use std::collections::HashMap;

use querypad_core::{parse_csv, ParsedTable, PlaygroundError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A CSV table the browser already parsed: `{headers: [...], rows: [{...}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvDataPayload {
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<HashMap<String, Value>>,
}

impl CsvDataPayload {
    /// Validate into a [`ParsedTable`]. Non-string cells are stringified and
    /// `null` becomes an empty value.
    pub fn into_table(self) -> Result<ParsedTable, PlaygroundError> {
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(key, value)| {
                        let text = match value {
                            Value::String(s) => s,
                            Value::Null => String::new(),
                            other => other.to_string(),
                        };
                        (key, text)
                    })
                    .collect()
            })
            .collect();
        ParsedTable::from_parts(self.headers, rows)
    }
}

/// Optional CSV attachment shared by every SQL request.
///
/// `csvData` is a pre-parsed table; `csvText` is raw CSV parsed server-side.
/// When both are given `csvData` wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvAttachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_data: Option<CsvDataPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl CsvAttachment {
    pub fn is_present(&self) -> bool {
        self.csv_data.is_some() || self.csv_text.is_some()
    }

    pub fn into_table(self) -> Result<Option<ParsedTable>, PlaygroundError> {
        match (self.csv_data, self.csv_text) {
            (Some(data), _) => data.into_table().map(Some),
            (None, Some(text)) => parse_csv(&text).map(Some),
            (None, None) => Ok(None),
        }
    }
}

/// Body of `/api/execute-sql` and `/api/execute-csv-sql`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(flatten)]
    pub csv: CsvAttachment,
}

/// Body of `/api/generate-sql` and `/api/generate-csv-sql`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(flatten)]
    pub csv: CsvAttachment,
}

/// Body of `/api/delete-all-tables`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteAllRequest {
    #[serde(default)]
    pub confirmation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execute_request_plain_query() {
        let req: ExecuteRequest = serde_json::from_value(json!({"query": "SELECT 1"})).unwrap();
        assert_eq!(req.query.as_deref(), Some("SELECT 1"));
        assert!(!req.csv.is_present());
        assert!(req.csv.into_table().unwrap().is_none());
    }

    #[test]
    fn test_execute_request_with_csv_data() {
        let req: ExecuteRequest = serde_json::from_value(json!({
            "query": "SELECT * FROM uploaded_csv",
            "csvData": {"headers": ["Name", "Age"], "rows": [{"Name": "Ann", "Age": 30}]},
            "filename": "people.csv"
        }))
        .unwrap();

        assert_eq!(req.csv.filename.as_deref(), Some("people.csv"));
        let table = req.csv.into_table().unwrap().unwrap();
        assert_eq!(table.headers(), &["Name", "Age"]);
        assert_eq!(table.value(0, "Age"), Some("30"));
    }

    #[test]
    fn test_csv_text_is_parsed_server_side() {
        let req: ExecuteRequest = serde_json::from_value(json!({
            "query": "SELECT 1",
            "csvText": "a,b\n1,2\n"
        }))
        .unwrap();
        let table = req.csv.into_table().unwrap().unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_null_cells_become_empty() {
        let payload = CsvDataPayload {
            headers: vec!["a".to_string()],
            rows: vec![HashMap::from([("a".to_string(), Value::Null)])],
        };
        let table = payload.into_table().unwrap();
        assert_eq!(table.value(0, "a"), Some(""));
    }

    #[test]
    fn test_invalid_csv_text_is_malformed_input() {
        let attachment = CsvAttachment {
            csv_text: Some("header_only\n".to_string()),
            ..Default::default()
        };
        assert!(matches!(attachment.into_table(), Err(PlaygroundError::MalformedInput(_))));
    }

    #[test]
    fn test_missing_fields_default() {
        let req: GenerateRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.prompt.is_none());
        let req: DeleteAllRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.confirmation.is_none());
    }
}

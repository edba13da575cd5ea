//! CSV parsing into a [`ParsedTable`].
//!
//! The tokenizer is deliberately small: `"` toggles a quoted section and is
//! never kept, `,` outside quotes ends a field, and fields are trimmed. There is
//! no escaped-quote support. Values are always strings; typing is left to the
//! engine and to whoever reads the results.

use std::collections::{HashMap, HashSet};

use crate::error::{PlaygroundError, Result};

/// A CSV file parsed into headers and positional rows.
///
/// Invariants: headers are non-empty and unique, and every row holds exactly
/// one value per header (missing values are `""`). Header order is column
/// order everywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// Build a table from a client-supplied literal (`{headers, rows}`).
    ///
    /// Headers and row keys are trimmed alike. Row keys that are not headers
    /// are ignored; headers missing from a row become `""`.
    pub fn from_parts(headers: Vec<String>, rows: Vec<HashMap<String, String>>) -> Result<Self> {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        validate_headers(&headers)?;

        if rows.is_empty() {
            return Err(PlaygroundError::MalformedInput(
                "CSV data must contain at least one data row".to_string(),
            ));
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                let mut row: HashMap<String, String> =
                    row.into_iter().map(|(key, value)| (key.trim().to_string(), value)).collect();
                headers
                    .iter()
                    .map(|header| row.remove(header).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rows as positional values, aligned with [`ParsedTable::headers`].
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Value of `header` in row `index`.
    pub fn value(&self, index: usize, header: &str) -> Option<&str> {
        let column = self.headers.iter().position(|h| h == header)?;
        self.rows.get(index).map(|row| row[column].as_str())
    }

    /// Serialize back to CSV text that [`parse_csv`] accepts.
    ///
    /// Fields containing a comma are wrapped in quotes. Since the parser has no
    /// escape syntax, a field containing `"` does not survive unchanged.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_record(&mut out, &self.headers);
        for row in &self.rows {
            push_record(&mut out, row);
        }
        out
    }
}

fn push_record(out: &mut String, fields: &[String]) {
    let record: Vec<String> = fields
        .iter()
        .map(|field| {
            if field.contains(',') {
                format!("\"{}\"", field)
            } else {
                field.clone()
            }
        })
        .collect();
    out.push_str(&record.join(","));
    out.push('\n');
}

fn validate_headers(headers: &[String]) -> Result<()> {
    if headers.is_empty() {
        return Err(PlaygroundError::MalformedInput("CSV header row has no columns".to_string()));
    }

    let mut seen = HashSet::with_capacity(headers.len());
    for header in headers {
        if header.is_empty() {
            return Err(PlaygroundError::MalformedInput(
                "CSV header contains an empty column name".to_string(),
            ));
        }
        if !seen.insert(header.as_str()) {
            return Err(PlaygroundError::MalformedInput(format!(
                "Duplicate column name '{}' in CSV header",
                header
            )));
        }
    }
    Ok(())
}

/// Parse raw CSV text. LF and CRLF line endings are accepted, blank lines are
/// skipped, and the first remaining line is the header.
///
/// Short rows are padded with `""`; values past the last header are dropped.
pub fn parse_csv(text: &str) -> Result<ParsedTable> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();

    if lines.len() < 2 {
        return Err(PlaygroundError::MalformedInput(
            "CSV file must have at least a header row and one data row".to_string(),
        ));
    }

    let headers = split_csv_line(lines[0]);
    validate_headers(&headers)?;

    let rows = lines[1..]
        .iter()
        .map(|line| {
            let mut values = split_csv_line(line);
            values.resize(headers.len(), String::new());
            values
        })
        .collect();

    log::debug!(
        target: "csv::parse",
        "Parsed CSV: {} column(s), {} row(s)",
        headers.len(),
        lines.len() - 1
    );

    Ok(ParsedTable { headers, rows })
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            },
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

//! Fixed-width text rendering of result rows.

use serde_json::Value;

use crate::executor::Row;

/// Shown instead of a table when there are no rows.
pub const NO_RESULTS: &str = "No results returned.";

/// Column names and their rendered widths, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    pub names: Vec<String>,
    pub widths: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTable {
    pub formatted: String,
    pub column_info: ColumnInfo,
}

/// Render a cell the way every table and export shows it.
///
/// `NULL` is the literal text `NULL`, never an empty string. Floats with no
/// fractional part print as integers.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Render `rows` as an ASCII table:
///
/// ```text
/// +------+-----+
/// | Name | Age |
/// +------+-----+
/// | Ann  | 30  |
/// +------+-----+
/// ```
///
/// Widths are measured in characters. With no rows the text is
/// [`NO_RESULTS`] and the column info is empty.
pub fn format_table(columns: &[String], rows: &[Row]) -> FormattedTable {
    if rows.is_empty() {
        return FormattedTable {
            formatted: NO_RESULTS.to_string(),
            column_info: ColumnInfo::default(),
        };
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|col| row.get(col).map(display_value).unwrap_or_else(|| "NULL".to_string()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            cells
                .iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let separator = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&render_line(columns, &widths));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_line(row, &widths));
        out.push('\n');
    }
    out.push_str(&separator);

    FormattedTable {
        formatted: out,
        column_info: ColumnInfo {
            names: columns.to_vec(),
            widths,
        },
    }
}

fn render_line(values: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (value, width) in values.iter().zip(widths) {
        line.push_str(&format!(" {:<width$} |", value, width = *width));
    }
    line
}

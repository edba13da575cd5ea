//! Destructive-statement policy.
//!
//! Matching is lower-cased substring containment, not tokenization. Runs of
//! whitespace and comments count as a single space, so `DROP/**/TABLE` and
//! `DELETE\tFROM` match like their plain forms. A pattern inside a string
//! literal or an identifier is still rejected; false positives are accepted,
//! false negatives are not.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static RE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(?:\s|/\*.*?\*/|--[^\n]*)+").unwrap());

const SHARED_DATASET_PATTERNS: &[&str] = &["drop table", "delete from", "truncate", "alter table"];
const UPLOADED_CSV_PATTERNS: &[&str] = &["drop table"];

/// A statement rejected by a [`SafetyPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PolicyViolation {
    /// Pattern that matched (lower-case)
    pub pattern: &'static str,
    /// User-facing reason
    pub reason: &'static str,
}

/// Which dataset a statement targets, and therefore which patterns apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyPolicy {
    /// The process-wide seeded dataset; strictest rules.
    SharedDataset,
    /// A request-scoped table synthesized from an uploaded CSV.
    UploadedCsv,
}

impl SafetyPolicy {
    fn patterns(self) -> &'static [&'static str] {
        match self {
            SafetyPolicy::SharedDataset => SHARED_DATASET_PATTERNS,
            SafetyPolicy::UploadedCsv => UPLOADED_CSV_PATTERNS,
        }
    }

    fn reason(self) -> &'static str {
        match self {
            SafetyPolicy::SharedDataset => "Destructive operations not allowed in this demo",
            SafetyPolicy::UploadedCsv => "Dropping the uploaded CSV table is not allowed",
        }
    }

    /// Allow or deny a single statement.
    pub fn check(self, sql: &str) -> Result<(), PolicyViolation> {
        let lower = normalize(sql);
        match self.patterns().iter().copied().find(|pattern| lower.contains(pattern)) {
            Some(pattern) => {
                log::debug!(
                    target: "sql::policy",
                    "Statement denied by {:?} policy (matched '{}')",
                    self,
                    pattern
                );
                Err(PolicyViolation {
                    pattern,
                    reason: self.reason(),
                })
            },
            None => Ok(()),
        }
    }
}

/// Lower-case `sql` and collapse whitespace and comments into one space.
fn normalize(sql: &str) -> String {
    RE_SEPARATOR.replace_all(&sql.to_lowercase(), " ").into_owned()
}

//! Statement classification by leading verb.
//!
//! The classifier looks at the first whitespace-delimited token of a trimmed
//! statement. It does not parse SQL; the engine does that when the statement
//! runs. The kind only picks an execution and result-shaping strategy.

use std::fmt;
use std::str::FromStr;

use crate::batch_execution::split_statements;
use crate::keywords::SqlKeyword;

/// Row-changing verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationVerb {
    Insert,
    Update,
    Delete,
}

impl MutationVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            MutationVerb::Insert => SqlKeyword::Insert.as_str(),
            MutationVerb::Update => SqlKeyword::Update.as_str(),
            MutationVerb::Delete => SqlKeyword::Delete.as_str(),
        }
    }
}

/// Schema-changing (or engine-control) verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DdlVerb {
    Create,
    Drop,
    Alter,
    Pragma,
}

impl DdlVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            DdlVerb::Create => SqlKeyword::Create.as_str(),
            DdlVerb::Drop => SqlKeyword::Drop.as_str(),
            DdlVerb::Alter => SqlKeyword::Alter.as_str(),
            DdlVerb::Pragma => SqlKeyword::Pragma.as_str(),
        }
    }
}

/// Coarse statement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Returns rows
    Select,
    /// INSERT / UPDATE / DELETE
    Mutate(MutationVerb),
    /// CREATE / DROP / ALTER / PRAGMA
    Ddl(DdlVerb),
    /// Anything else, still executed through the generic path
    Other,
}

impl StatementKind {
    /// Lower-case category name (`select`, `mutate`, `ddl`, `other`).
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Mutate(_) => "mutate",
            StatementKind::Ddl(_) => "ddl",
            StatementKind::Other => "other",
        }
    }

    /// Upper-case verb used in result messages, `None` for [`StatementKind::Other`].
    pub fn verb(&self) -> Option<&'static str> {
        match self {
            StatementKind::Select => Some(SqlKeyword::Select.as_str()),
            StatementKind::Mutate(verb) => Some(verb.as_str()),
            StatementKind::Ddl(verb) => Some(verb.as_str()),
            StatementKind::Other => None,
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, StatementKind::Select)
    }
}

impl From<SqlKeyword> for StatementKind {
    fn from(keyword: SqlKeyword) -> Self {
        match keyword {
            SqlKeyword::Select => StatementKind::Select,
            SqlKeyword::Insert => StatementKind::Mutate(MutationVerb::Insert),
            SqlKeyword::Update => StatementKind::Mutate(MutationVerb::Update),
            SqlKeyword::Delete => StatementKind::Mutate(MutationVerb::Delete),
            SqlKeyword::Create => StatementKind::Ddl(DdlVerb::Create),
            SqlKeyword::Drop => StatementKind::Ddl(DdlVerb::Drop),
            SqlKeyword::Alter => StatementKind::Ddl(DdlVerb::Alter),
            SqlKeyword::Pragma => StatementKind::Ddl(DdlVerb::Pragma),
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verb() {
            Some(verb) => write!(f, "{} ({})", self.as_str(), verb),
            None => f.write_str(self.as_str()),
        }
    }
}

/// A single classified SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    text: String,
    kind: StatementKind,
}

impl Statement {
    pub fn new(text: impl Into<String>, kind: StatementKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Trimmed SQL text, without the terminating `;`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }
}

/// Classify one statement by its leading verb.
///
/// The first whitespace-delimited token is lower-cased and cut at the first
/// character that cannot be part of a keyword, so `SELECT*` and `select(1)`
/// still classify as select.
pub fn classify(sql: &str) -> Statement {
    let text = sql.trim();
    let first_token = text.split_whitespace().next().unwrap_or("");
    let verb: String = first_token
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    let kind = SqlKeyword::from_str(&verb)
        .map(StatementKind::from)
        .unwrap_or(StatementKind::Other);

    Statement::new(text, kind)
}

/// Split a submission and classify every statement, in source order.
pub fn split_and_classify(sql: &str) -> Vec<Statement> {
    split_statements(sql).iter().map(|s| classify(s)).collect()
}

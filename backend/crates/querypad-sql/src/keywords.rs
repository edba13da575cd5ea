//! Leading SQL verbs recognized by the classifier.

use std::str::FromStr;

/// Statement-leading keywords that pick an execution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlKeyword {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    Pragma,
}

impl SqlKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            SqlKeyword::Select => "SELECT",
            SqlKeyword::Insert => "INSERT",
            SqlKeyword::Update => "UPDATE",
            SqlKeyword::Delete => "DELETE",
            SqlKeyword::Create => "CREATE",
            SqlKeyword::Drop => "DROP",
            SqlKeyword::Alter => "ALTER",
            SqlKeyword::Pragma => "PRAGMA",
        }
    }
}

impl FromStr for SqlKeyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "select" => Ok(SqlKeyword::Select),
            "insert" => Ok(SqlKeyword::Insert),
            "update" => Ok(SqlKeyword::Update),
            "delete" => Ok(SqlKeyword::Delete),
            "create" => Ok(SqlKeyword::Create),
            "drop" => Ok(SqlKeyword::Drop),
            "alter" => Ok(SqlKeyword::Alter),
            "pragma" => Ok(SqlKeyword::Pragma),
            _ => Err(()),
        }
    }
}

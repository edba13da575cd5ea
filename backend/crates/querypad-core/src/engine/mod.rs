//! Relational engine handles.
//!
//! - [`SharedDataset`]: the process-wide seeded database, one connection behind a mutex
//! - [`EphemeralEngine`]: a request-scoped database holding one table built from a CSV upload

mod ephemeral;
mod seed;
mod shared;

pub use ephemeral::{EphemeralEngine, UPLOADED_TABLE};
pub use seed::SEED_SQL;
pub use shared::SharedDataset;

/// Quote an identifier for SQLite, doubling embedded `"`.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::quote_identifier;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_identifier("Name"), "\"Name\"");
        assert_eq!(quote_identifier("first name"), "\"first name\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}

//! Batch SQL splitting.
//!
//! Splits a multi-statement submission into individual statements. The scanner
//! tracks quoted strings, quoted identifiers and comments, so a `;` inside a
//! literal or a comment never ends a statement.

/// Split a SQL batch payload into individual statements.
///
/// Statements come back trimmed, in source order, without their terminating
/// `;`. Fragments holding nothing but whitespace or comments are dropped.
///
/// An unterminated quote or block comment swallows the rest of the input into
/// one final statement; the engine reports the syntax error when it runs.
///
/// # Examples
///
/// ```
/// use querypad_sql::batch_execution::split_statements;
///
/// let statements = split_statements("CREATE TABLE t(id INT); INSERT INTO t VALUES (1);");
/// assert_eq!(statements.len(), 2);
/// assert_eq!(statements[0], "CREATE TABLE t(id INT)");
/// assert_eq!(statements[1], "INSERT INTO t VALUES (1)");
/// ```
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut has_content = false;
    let mut chars = sql.chars().peekable();

    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut in_backtick = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
            }
            current.push(ch);
            continue;
        }

        if in_block_comment {
            current.push(ch);
            if ch == '*' && chars.next_if_eq(&'/').is_some() {
                current.push('/');
                in_block_comment = false;
            }
            continue;
        }

        if !in_single_quote && !in_double_quote && !in_backtick {
            if ch == '-' && chars.next_if_eq(&'-').is_some() {
                current.push_str("--");
                in_line_comment = true;
                continue;
            }

            if ch == '/' && chars.next_if_eq(&'*').is_some() {
                current.push_str("/*");
                in_block_comment = true;
                continue;
            }
        }

        match ch {
            '\'' if !in_double_quote && !in_backtick => {
                has_content = true;
                current.push(ch);
                if in_single_quote && chars.next_if_eq(&'\'').is_some() {
                    // Escaped quote inside single-quoted string
                    current.push('\'');
                    continue;
                }
                in_single_quote = !in_single_quote;
            },
            '"' if !in_single_quote && !in_backtick => {
                has_content = true;
                current.push(ch);
                if in_double_quote && chars.next_if_eq(&'"').is_some() {
                    current.push('"');
                    continue;
                }
                in_double_quote = !in_double_quote;
            },
            '`' if !in_single_quote && !in_double_quote => {
                has_content = true;
                in_backtick = !in_backtick;
                current.push(ch);
            },
            ';' if !(in_single_quote || in_double_quote || in_backtick) => {
                push_statement(&mut statements, &current, has_content);
                current.clear();
                has_content = false;
            },
            _ => {
                if !ch.is_whitespace() {
                    has_content = true;
                }
                current.push(ch);
            },
        }
    }

    if in_single_quote || in_double_quote || in_backtick || in_block_comment {
        log::debug!(
            target: "sql::split",
            "Unterminated quote or comment; keeping remainder as a single statement"
        );
    }

    push_statement(&mut statements, &current, has_content);
    statements
}

fn push_statement(statements: &mut Vec<String>, fragment: &str, has_content: bool) {
    let stmt = fragment.trim();
    if has_content && !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::split_statements;

    #[test]
    fn splits_simple_statements() {
        let statements = split_statements("SELECT 1; SELECT 2;");
        assert_eq!(statements, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn skips_empty_fragments() {
        let statements = split_statements(";;  SELECT 1 ;\n;  ; ");
        assert_eq!(statements, vec!["SELECT 1"]);
    }

    #[test]
    fn no_terminator_yields_single_statement() {
        let statements = split_statements("  SELECT * FROM Books  ");
        assert_eq!(statements, vec!["SELECT * FROM Books"]);
    }

    #[test]
    fn ignores_semicolons_in_strings() {
        let sql = "INSERT INTO logs(message) VALUES('value;still part of string'); SELECT 1;";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("value;still part of string"));
    }

    #[test]
    fn ignores_semicolons_in_quoted_identifiers() {
        let statements = split_statements(r#"SELECT "odd;name" FROM t; SELECT 2"#);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], r#"SELECT "odd;name" FROM t"#);
    }

    #[test]
    fn ignores_semicolons_in_comments() {
        let sql = "SELECT 1; -- second statement;\nSELECT 2; /* comment; */ SELECT 3;";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 3);
    }

    #[test]
    fn drops_comment_only_fragments() {
        let statements = split_statements("SELECT 1; /* trailing note */ ; -- done");
        assert_eq!(statements, vec!["SELECT 1"]);
    }

    #[test]
    fn handles_escaped_quotes() {
        let sql = "INSERT INTO t(text) VALUES('It''s fine; really'); SELECT 1;";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("It''s fine; really"));
    }

    #[test]
    fn unterminated_string_keeps_remainder() {
        let statements = split_statements("SELECT 1; INSERT INTO t(text) VALUES('missing end); SELECT 2");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1], "INSERT INTO t(text) VALUES('missing end); SELECT 2");
    }
}

//! Cleanup of SQL produced by a language model.
//!
//! Model output routinely arrives wrapped in markdown fences or prefixed with
//! `--` commentary. The same cleanup runs on submitted queries before they are
//! executed.

use once_cell::sync::Lazy;
use regex::Regex;

/// Language tag and whitespace that may follow an opening fence.
static RE_FENCE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)(?:sqlite|sql)?\s*").unwrap());

/// Strip markdown code fences and `--` comments, then trim.
///
/// ```
/// use querypad_sql::clean_sql_query;
///
/// assert_eq!(clean_sql_query("```sql\nSELECT 1;\n```"), "SELECT 1;");
/// ```
pub fn clean_sql_query(query: &str) -> String {
    strip_fences_and_comments(query).trim().to_string()
}

/// Remove ```` ``` ```` fences (with an optional `sql`/`sqlite` tag) and `--`
/// comments up to (not including) the end of line.
///
/// Quote state is tracked so `'a--b'` and `'```'` survive intact.
fn strip_fences_and_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut rest = sql;

    while let Some(ch) = rest.chars().next() {
        let quoted = in_single_quote || in_double_quote;
        if !quoted && rest.starts_with("```") {
            let after = &rest[3..];
            let tag_len = RE_FENCE_TAG.find(after).map_or(0, |m| m.end());
            rest = &after[tag_len..];
            continue;
        }
        if !quoted && rest.starts_with("--") {
            let end = rest.find('\n').unwrap_or(rest.len());
            rest = &rest[end..];
            continue;
        }

        match ch {
            '\'' if !in_double_quote => in_single_quote = !in_single_quote,
            '"' if !in_single_quote => in_double_quote = !in_double_quote,
            _ => {},
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::clean_sql_query;

    #[test]
    fn strips_sql_fence() {
        assert_eq!(clean_sql_query("```sql\nSELECT 1;\n```"), "SELECT 1;");
    }

    #[test]
    fn strips_bare_and_upper_case_fences() {
        assert_eq!(clean_sql_query("```\nSELECT 1;\n```\n"), "SELECT 1;");
        assert_eq!(clean_sql_query("```SQL\nSELECT 2;\n```"), "SELECT 2;");
        assert_eq!(clean_sql_query("```sqlite\nSELECT 3;```"), "SELECT 3;");
    }

    #[test]
    fn strips_leading_comment_lines() {
        let raw = "-- Find all books\n-- ordered by year\nSELECT * FROM Books ORDER BY PublicationYear;";
        assert_eq!(clean_sql_query(raw), "SELECT * FROM Books ORDER BY PublicationYear;");
    }

    #[test]
    fn strips_trailing_comments_but_keeps_the_line() {
        let raw = "SELECT Title -- the title\nFROM Books;";
        assert_eq!(clean_sql_query(raw), "SELECT Title \nFROM Books;");
    }

    #[test]
    fn keeps_double_dash_inside_literals() {
        let raw = "SELECT 'a--b' AS s, \"c--d\" FROM t";
        assert_eq!(clean_sql_query(raw), raw);
    }

    #[test]
    fn plain_query_is_only_trimmed() {
        assert_eq!(clean_sql_query("   SELECT 1   \n"), "SELECT 1");
        assert_eq!(clean_sql_query(""), "");
    }

    #[test]
    fn keeps_backticks_inside_literals() {
        assert_eq!(clean_sql_query("SELECT '```' AS x"), "SELECT '```' AS x");
        assert_eq!(
            clean_sql_query("```sql\nSELECT '```sql' AS fence;\n```"),
            "SELECT '```sql' AS fence;"
        );
    }
}

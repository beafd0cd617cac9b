//! SQL statement logging via `tracing`.
//!
//! Every statement a model runs goes through a `*_tagged` method on
//! [`GenericClient`](crate::GenericClient), which emits one `debug` event on the
//! `jobly.sql` target before execution. Bound values are never logged; only the
//! placeholder count is.

/// Longest SQL text (in bytes) written to a log event.
pub const MAX_LOGGED_SQL: usize = 200;

/// Truncate `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn display_sql(sql: &str) -> String {
    // Collapse the indentation of multi-line model queries.
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.len() > MAX_LOGGED_SQL {
        format!("{}...", truncate_sql_bytes(&flat, MAX_LOGGED_SQL))
    } else {
        flat
    }
}

/// Emit the statement that is about to run.
pub(crate) fn log_statement(tag: &str, sql: &str, param_count: usize) {
    if !tracing::enabled!(target: "jobly.sql", tracing::Level::DEBUG) {
        return;
    }
    tracing::debug!(
        target: "jobly.sql",
        tag,
        param_count,
        sql = %display_sql(sql),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("SELECT 1", 6), "SELECT");
        // 'é' is two bytes; cutting in the middle backs off.
        assert_eq!(truncate_sql_bytes("aé", 2), "a");
    }

    #[test]
    fn display_sql_flattens_whitespace() {
        let sql = "SELECT id,\n       title\n  FROM jobs";
        assert_eq!(display_sql(sql), "SELECT id, title FROM jobs");
    }

    #[test]
    fn display_sql_truncates_long_statements() {
        let sql = format!("SELECT {} FROM jobs", "x, ".repeat(200));
        let shown = display_sql(&sql);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.len(), MAX_LOGGED_SQL + 3);
    }
}

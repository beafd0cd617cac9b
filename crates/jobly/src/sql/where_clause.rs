//! AND-joined WHERE fragments for listing queries.

use super::param::ParamList;
use tokio_postgres::types::ToSql;

/// Predicates (joined with `AND`) and the values their placeholders bind to.
///
/// Every predicate that carries a value pushes it first and takes the new
/// length of the value list as its placeholder index, so numbering stays
/// contiguous whichever predicates were added.
#[derive(Clone, Debug, Default)]
pub struct WhereFragment {
    predicates: Vec<String>,
    values: ParamList,
}

impl WhereFragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    fn and_bound<T>(&mut self, column: &str, op: &str, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        let idx = self.values.push(value);
        self.predicates.push(format!("{column} {op} ${idx}"));
        self
    }

    /// Add `column >= $n`.
    pub fn and_gte<T>(&mut self, column: &str, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.and_bound(column, ">=", value)
    }

    /// Add `column <= $n`.
    pub fn and_lte<T>(&mut self, column: &str, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.and_bound(column, "<=", value)
    }

    /// Add `column ILIKE $n` with `%needle%` bound, a case-insensitive
    /// substring match.
    pub fn and_contains(&mut self, column: &str, needle: &str) -> &mut Self {
        self.and_bound(column, "ILIKE", format!("%{needle}%"))
    }

    /// Add a predicate that binds nothing, such as `equity > 0`.
    pub fn and_raw(&mut self, predicate: &str) -> &mut Self {
        self.predicates.push(predicate.to_string());
        self
    }

    /// Whether no predicate has been added.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// The predicates joined with ` AND `, without the `WHERE` keyword.
    ///
    /// Empty when no predicate was added.
    pub fn clause(&self) -> String {
        self.predicates.join(" AND ")
    }

    /// `" WHERE <clause>"`, or an empty string when there are no predicates.
    pub fn to_where_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clause())
        }
    }

    /// Values in placeholder order.
    pub fn values(&self) -> &ParamList {
        &self.values
    }
}

//! Partial-update `SET` fragments.
//!
//! ```ignore
//! let payload = UpdatePayload::new()
//!     .set("firstName", "Aliya")
//!     .set("age", 32_i32);
//! let names = FieldNameMap::from([("firstName", "first_name")]);
//!
//! let set = sql_for_partial_update(&payload, &names)?;
//! assert_eq!(set.set_cols(), r#""first_name"=$1, "age"=$2"#);
//! ```

use super::param::{Param, ParamList};
use crate::error::{JoblyError, JoblyResult};
use std::collections::BTreeMap;
use std::fmt::Write;
use tokio_postgres::types::ToSql;

/// Fields to change in a partial update, in insertion order.
///
/// Absent fields are left untouched by the update. A field set to `None::<T>`
/// is written as SQL `NULL`.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct UpdatePayload {
    fields: Vec<(String, Param)>,
}

impl UpdatePayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field (consuming version).
    pub fn set<T>(mut self, field: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.insert(field, value);
        self
    }

    /// Set an optional field (None => field is left out of the update).
    pub fn set_opt<T>(self, field: impl Into<String>, value: Option<T>) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    /// Set a field in place.
    ///
    /// Setting a field twice keeps its first position and the last value.
    pub fn insert<T>(&mut self, field: impl Into<String>, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        let field = field.into();
        let param = Param::new(value);
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = param,
            None => self.fields.push((field, param)),
        }
        self
    }

    /// Number of fields in the payload.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field has been set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// Translation from logical field names to physical column names.
///
/// Fields without an entry are used as the column name unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldNameMap {
    columns: BTreeMap<String, String>,
}

impl FieldNameMap {
    /// A map with no translations; every field is its own column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation (consuming version).
    pub fn with(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    /// Resolve the column for `field`, falling back to `field` itself.
    pub fn column<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map_or(field, String::as_str)
    }
}

impl<F, C> FromIterator<(F, C)> for FieldNameMap
where
    F: Into<String>,
    C: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, C)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(f, c)| (f.into(), c.into()))
                .collect(),
        }
    }
}

impl<F, C, const N: usize> From<[(F, C); N]> for FieldNameMap
where
    F: Into<String>,
    C: Into<String>,
{
    fn from(pairs: [(F, C); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A rendered `SET` list and the values its placeholders bind to.
#[derive(Clone, Debug)]
pub struct SetClause {
    set_cols: String,
    values: ParamList,
}

impl SetClause {
    /// The `"column"=$n, ...` list, without the `SET` keyword.
    pub fn set_cols(&self) -> &str {
        &self.set_cols
    }

    /// Values in placeholder order.
    pub fn values(&self) -> &ParamList {
        &self.values
    }

    /// Index of the first placeholder free for the caller's own parameters,
    /// e.g. the `WHERE id = $k` of the surrounding `UPDATE`.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Split into the list text and its values.
    pub fn into_parts(self) -> (String, ParamList) {
        (self.set_cols, self.values)
    }
}

/// Build the `SET` list of a partial `UPDATE`.
///
/// Field `i` of `payload` (1-based, insertion order) becomes `"<column>"=$i`
/// with its column resolved through `field_names`. Values are returned
/// separately and never written into the SQL text.
///
/// Returns [`JoblyError::NoData`] when `payload` is empty.
pub fn sql_for_partial_update(
    payload: &UpdatePayload,
    field_names: &FieldNameMap,
) -> JoblyResult<SetClause> {
    if payload.is_empty() {
        return Err(JoblyError::NoData);
    }

    let mut set_cols = String::new();
    let mut values = ParamList::new();
    for (field, value) in &payload.fields {
        if !values.is_empty() {
            set_cols.push_str(", ");
        }
        let idx = values.push_param(value.clone());
        push_quoted_ident(&mut set_cols, field_names.column(field));
        let _ = write!(set_cols, "=${idx}");
    }

    Ok(SetClause { set_cols, values })
}

/// Write `"name"`, doubling any embedded `"`.
fn push_quoted_ident(out: &mut String, name: &str) {
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

//! Parameterized SQL fragments.
//!
//! Both builders keep SQL text and bound values strictly apart: the text only
//! ever contains `$1, $2, ...` placeholders, and the values travel alongside it
//! in a [`ParamList`] whose order matches the placeholder numbers.
//!
//! - [`sql_for_partial_update`] renders the `SET` list of a partial `UPDATE`.
//! - [`WhereFragment`] collects `AND`-joined predicates for listing queries.

mod param;
mod partial_update;
mod where_clause;

#[cfg(test)]
mod tests;

pub use param::{Param, ParamList};
pub use partial_update::{FieldNameMap, SetClause, UpdatePayload, sql_for_partial_update};
pub use where_clause::WhereFragment;

//! # jobly
//!
//! The data layer of the jobly jobs board, on PostgreSQL.
//!
//! ## Features
//!
//! - **Parameter-safe fragments**: partial-update `SET` lists and filtered-listing
//!   `WHERE` bodies render `$n` placeholders and carry their values separately
//! - **Models**: jobs, companies and users as plain async functions over any
//!   [`GenericClient`] (connection, pooled connection or transaction)
//! - **Auth**: JWT issue/verify and role checks
//! - **Observability**: every statement is logged on the `jobly.sql` tracing target
//!
//! ## Partial updates
//!
//! ```ignore
//! use jobly::{FieldNameMap, UpdatePayload, sql_for_partial_update};
//!
//! let payload = UpdatePayload::new()
//!     .set("numEmployees", 12)
//!     .set("description", "Widgets");
//! let names = FieldNameMap::from([("numEmployees", "num_employees")]);
//!
//! let set = sql_for_partial_update(&payload, &names)?;
//! // "num_employees"=$1, "description"=$2
//! let sql = format!(
//!     "UPDATE companies SET {} WHERE handle = ${}",
//!     set.set_cols(),
//!     set.next_placeholder(),
//! );
//! ```
//!
//! ## Filtered listings
//!
//! ```ignore
//! use jobly::{Job, JobFilter};
//!
//! let filter = JobFilter::default().min_salary(50_000).has_equity(true);
//! let jobs = Job::find_all(&client, &filter).await?;
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod row;
pub mod sql;

pub use auth::{
    Claims, authenticate_jwt, create_token, ensure_admin, ensure_correct_user_or_admin,
    ensure_logged_in, verify_token,
};
pub use client::GenericClient;
pub use config::JoblyConfig;
pub use error::{JoblyError, JoblyResult};
pub use models::{
    Company, CompanyDetail, CompanyFilter, CompanyUpdate, Job, JobDetail, JobFilter, JobListing,
    JobUpdate, NewCompany, NewJob, User, UserDetail, UserUpdate,
};
pub use row::{FromRow, RowExt};
pub use sql::{FieldNameMap, Param, ParamList, SetClause, UpdatePayload, WhereFragment, sql_for_partial_update};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from, create_pool_with_config};

#[cfg(feature = "migrate")]
pub mod migrate;

//! Entity models.
//!
//! Each model is a set of associated functions taking any
//! [`GenericClient`](crate::GenericClient), so they run equally on a plain
//! connection, a pooled connection, or a transaction.

pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyDetail, CompanyFilter, CompanyJob, CompanyUpdate, NewCompany};
pub use job::{Job, JobDetail, JobFilter, JobListing, JobUpdate, NewJob};
pub use user::{User, UserDetail, UserUpdate};

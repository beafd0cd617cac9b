//! Schema migrations via [`refinery`].
//!
//! The jobly schema ships with the crate (`migrations/V*__*.sql`) and is
//! embedded at compile time.

use crate::error::JoblyResult;

pub use refinery::Report;

mod embedded {
    refinery::embed_migrations!("./migrations");
}

/// Apply all pending migrations on a single connection.
pub async fn run(client: &mut tokio_postgres::Client) -> JoblyResult<Report> {
    Ok(embedded::migrations::runner().run_async(client).await?)
}

/// Acquire a connection from a pool and apply all pending migrations on it.
#[cfg(feature = "pool")]
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> JoblyResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}

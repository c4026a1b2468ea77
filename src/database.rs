//! This module contains general database utilities.
//!
//! The database is optional. If it is configured, a single connection pool is
//! created on startup, handed to the services that need it, and kept alive
//! for the lifetime of the process.

use std::num::NonZero;
use std::thread;

use sqlx::pool::PoolOptions;
use sqlx::PgPool;
use url::Url;

/// Creates a database connection pool and runs migrations.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn create_pool(url: &Url) -> sqlx::Result<PgPool>
{
	let pool = PoolOptions::new()
		.max_connections(max_connections())
		.connect(url.as_str())
		.await?;

	sqlx::migrate!("./database/migrations").run(&pool).await?;

	tracing::info!("connected to database");

	Ok(pool)
}

/// The maximum number of database pool connections to use.
fn max_connections() -> u32
{
	let available = thread::available_parallelism().map_or(1, NonZero::get);

	u32::try_from(available.saturating_mul(2)).unwrap_or(u32::MAX)
}

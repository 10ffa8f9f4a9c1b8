//! Database connection pool initialization.
//!
//! Reads `DATABASE_URL` and connects once at startup; the returned pool is
//! cheaply cloneable and shared through [`crate::state::AppState`].

use sqlx::PgPool;
use std::env;

/// Initialize a PostgreSQL connection pool from `DATABASE_URL`.
///
/// # Panics
///
/// Panics if the variable is unset or the database is unreachable. This runs
/// once at startup; there is no service to run without a database.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

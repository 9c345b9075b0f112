//! PostgreSQL persistence for products and stock adjustments.
//!
//! - [`models`]: row structs and input DTOs
//! - [`repositories`]: plain reads, listings and the catalog seed
//! - [`ledger`]: transactional stock-changing operations
//! - [`migrations`]: schema migration ledger with single-step rollback

use sqlx::postgres::PgPoolOptions;

pub mod ledger;
pub mod migrations;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply every pending migration.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    migrations::MIGRATOR.run(pool).await
}

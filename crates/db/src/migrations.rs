//! Schema migration ledger.
//!
//! Migrations are reversible sqlx migrations embedded from `db/migrations`.
//! Applying is forward-only and idempotent; a migration is recorded only
//! after its SQL succeeds. Rollback undoes exactly the most recently applied
//! migration.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use stockroom_core::types::Timestamp;

/// Every migration shipped with this crate.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../db/migrations");

/// A migration recorded in the ledger table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub description: String,
    pub installed_on: Timestamp,
}

/// Applied/pending state of one shipped migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

/// List successfully applied migrations, oldest first.
///
/// Returns an empty list if the ledger table does not exist yet.
pub async fn applied(pool: &PgPool) -> Result<Vec<AppliedMigration>, sqlx::Error> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;
    if !exists {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, description, installed_on FROM _sqlx_migrations
         WHERE success = true
         ORDER BY version",
    )
    .fetch_all(pool)
    .await
}

/// Report every shipped migration with whether it has been applied.
pub async fn status(pool: &PgPool) -> Result<Vec<MigrationStatus>, sqlx::Error> {
    let applied = applied(pool).await?;
    Ok(MIGRATOR
        .iter()
        .filter(|m| m.migration_type.is_up_migration())
        .map(|m| MigrationStatus {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.iter().any(|a| a.version == m.version),
        })
        .collect())
}

/// Apply every pending migration, returning the versions that were applied.
pub async fn migrate(pool: &PgPool) -> Result<Vec<i64>, MigrateError> {
    let before = applied(pool).await?;
    MIGRATOR.run(pool).await?;
    let after = applied(pool).await?;

    Ok(after
        .into_iter()
        .map(|m| m.version)
        .filter(|v| !before.iter().any(|b| b.version == *v))
        .collect())
}

/// Undo the most recently applied migration.
///
/// Returns the migration that was rolled back, or `None` if nothing has been
/// applied.
pub async fn rollback_last(pool: &PgPool) -> Result<Option<AppliedMigration>, MigrateError> {
    let applied = applied(pool).await?;
    let Some(last) = applied.last().cloned() else {
        return Ok(None);
    };

    // `undo` reverts everything above the target, so target the previous one.
    let target = applied
        .iter()
        .rev()
        .nth(1)
        .map(|m| m.version)
        .unwrap_or(0);

    tracing::info!(version = last.version, description = %last.description, "Rolling back migration");
    MIGRATOR.undo(pool, target).await?;

    Ok(Some(last))
}

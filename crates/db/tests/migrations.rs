//! Integration tests for the migration ledger and single-step rollback.

use sqlx::PgPool;
use stockroom_db::migrations;

async fn table_exists(pool: &PgPool, table: &str) -> bool {
    let (exists,): (bool,) = sqlx::query_as("SELECT to_regclass($1) IS NOT NULL")
        .bind(table)
        .fetch_one(pool)
        .await
        .unwrap();
    exists
}

/// Full bootstrap: every shipped migration is recorded as applied.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_migrations_applied(pool: PgPool) {
    stockroom_db::health_check(&pool).await.unwrap();

    let status = migrations::status(&pool).await.unwrap();
    assert!(!status.is_empty());
    assert!(status.iter().all(|m| m.applied), "{status:?}");

    assert!(table_exists(&pool, "products").await);
    assert!(table_exists(&pool, "adjustments").await);
}

/// Running migrations again applies nothing.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_migrate_is_idempotent(pool: PgPool) {
    let applied = migrations::migrate(&pool).await.unwrap();
    assert!(applied.is_empty());
}

/// Rollback undoes only the latest migration; migrate re-applies it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rollback_undoes_only_latest(pool: PgPool) {
    let before = migrations::applied(&pool).await.unwrap();
    let latest = before.last().unwrap().version;

    let rolled_back = migrations::rollback_last(&pool).await.unwrap().unwrap();
    assert_eq!(rolled_back.version, latest);

    let after = migrations::applied(&pool).await.unwrap();
    assert_eq!(after.len(), before.len() - 1);
    assert!(!table_exists(&pool, "adjustments").await);
    assert!(table_exists(&pool, "products").await);

    let reapplied = migrations::migrate(&pool).await.unwrap();
    assert_eq!(reapplied, vec![latest]);
    assert!(table_exists(&pool, "adjustments").await);
}

/// Rolling back everything leaves an empty ledger and nothing to undo.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rollback_until_empty(pool: PgPool) {
    let count = migrations::applied(&pool).await.unwrap().len();
    for _ in 0..count {
        assert!(migrations::rollback_last(&pool).await.unwrap().is_some());
    }

    assert!(migrations::applied(&pool).await.unwrap().is_empty());
    assert!(migrations::rollback_last(&pool).await.unwrap().is_none());
    assert!(!table_exists(&pool, "products").await);
}

//! # Schema Migrations
//!
//! The SQL under `migrations/sqlite/` is compiled into the crate, so the
//! server and the seeder can open an empty file and get the full schema:
//!
//! ```text
//! 001_initial_schema.sql   medicines, sales (FK → medicines ON DELETE CASCADE),
//!                          suppliers, indexes for search and daily totals
//! ```
//!
//! New schema changes go in a new `NNN_description.sql` file. Applied files
//! are checksummed in `_sqlx_migrations`, so editing one breaks every
//! existing database.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the schema up to date. A no-op on an up-to-date database.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts, reported by the health endpoint.
///
/// A database that was never migrated reports zero applied rather than an
/// error.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let has_table: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if has_table == 0 {
        return Ok((embedded, 0));
    }

    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok((embedded, applied as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_all_migrations_applied() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (embedded, applied) = migration_status(db.pool()).await.unwrap();

        assert!(embedded >= 1);
        assert_eq!(embedded, applied);
    }

    #[tokio::test]
    async fn test_rerun_is_noop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.run_migrations().await.unwrap();

        let (embedded, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(embedded, applied);
    }

    #[tokio::test]
    async fn test_unmigrated_database_reports_zero() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let (embedded, applied) = migration_status(db.pool()).await.unwrap();
        assert!(embedded >= 1);
        assert_eq!(applied, 0);
    }
}

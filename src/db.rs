//! Database module
//!
//! Connection checks and schema migrations.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;

/// Migrations under `migrations/`, embedded at build time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Tables the service cannot run without
const REQUIRED_TABLES: &[&str] = &["users", "categories", "budgets", "transactions"];

/// Verify database connectivity
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Apply pending migrations.
///
/// Runs under a Postgres advisory lock, so instances starting together apply
/// each file once. Fails if an applied file was edited since.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;

    tracing::info!(
        latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default(),
        "Migrations up to date"
    );

    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = current_schema() AND table_name = $1
            )
            "#,
        )
        .bind(*table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}

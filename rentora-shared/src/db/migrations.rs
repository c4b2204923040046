/// Database migration runner
///
/// Migrations live in the `migrations/` directory at the workspace root.
/// Each migration is a `{version}_{name}.up.sql` / `.down.sql` pair and is
/// applied in a transaction where the statements allow it.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed, a statement fails, or
/// the connection is lost mid-run. A failed migration is rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("../migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

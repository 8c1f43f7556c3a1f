//! Database migration command.

use super::CommandError;

/// Run admin database migrations.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

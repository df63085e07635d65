//! Database migration command.
//!
//! Applies the migrations embedded in the server crate. The server also
//! runs them on startup, so this mostly matters for preparing a database
//! before first boot or in CI.

use super::CliError;

/// Run all pending database migrations.
pub async fn run() -> Result<(), CliError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = stockroom_server::db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    stockroom_server::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

//! CLI command implementations.

pub mod migrate;
pub mod user;

use secrecy::SecretString;
use stockroom_server::services::auth::AuthError;

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] stockroom_core::EmailError),

    #[error("invalid role: {0}")]
    InvalidRole(#[from] stockroom_core::RoleParseError),

    #[error("no user with that email")]
    UserNotFound,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] stockroom_server::db::RepositoryError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Resolve the database URL from the environment.
///
/// Reads `STOCKROOM_DATABASE_URL`, falling back to `DATABASE_URL`. A `.env`
/// file is honored when present.
pub fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("STOCKROOM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("STOCKROOM_DATABASE_URL"))
}

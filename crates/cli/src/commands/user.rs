//! User provisioning commands.
//!
//! HTTP registration only ever creates members; admins are minted here.

use std::str::FromStr;

use stockroom_core::{Email, Role};
use stockroom_server::db::{RepositoryError, UserRepository};
use stockroom_server::services::auth::AuthService;

use super::CliError;

/// Create a user with the given role.
pub async fn create(
    email: &str,
    name: Option<&str>,
    password: &str,
    role: &str,
) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    // Stored role strings are uppercase; accept the friendlier lowercase
    // form on the command line.
    let role = Role::from_str(&role.to_ascii_uppercase())?;

    let database_url = super::database_url()?;
    let pool = stockroom_server::db::create_pool(&database_url).await?;

    let user = AuthService::new(&pool)
        .provision(&email, password, name, role)
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role.as_str(), "user created");
    Ok(())
}

/// Promote an existing user to admin.
pub async fn promote(email: &str) -> Result<(), CliError> {
    let email = Email::parse(email)?;

    let database_url = super::database_url()?;
    let pool = stockroom_server::db::create_pool(&database_url).await?;

    let user = UserRepository::new(&pool)
        .set_role(&email, Role::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => CliError::UserNotFound,
            other => CliError::Repository(other),
        })?;

    tracing::info!(user_id = %user.id, "user promoted to admin");
    Ok(())
}

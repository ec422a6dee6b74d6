use std::sync::Arc;

use crate::domain::user::hashing::CredentialHasher;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::CredentialStore;

/// Resolves submitted credentials to a user identity.
///
/// Unknown national codes, soft-deleted accounts and wrong passwords all
/// fail with the same `InvalidCredentials` error.
pub struct Authenticator<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    hasher: CredentialHasher,
}

impl<S> Authenticator<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Check credentials and return the identity they belong to.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No active user with this national code, or wrong password
    /// * `Password` - The stored hash is malformed
    /// * `DatabaseError` - Database operation failed
    pub async fn authenticate(&self, command: LoginCommand) -> Result<UserId, UserError> {
        // TODO: verify against a dummy hash on lookup miss so both failure paths take the same time.
        let user = match self
            .store
            .find_by_national_code(&command.national_code)
            .await?
        {
            Some(user) if user.is_active() => user,
            Some(user) => {
                tracing::debug!(user_id = %user.id, "Login rejected: account deleted");
                return Err(UserError::InvalidCredentials);
            }
            None => {
                tracing::debug!("Login rejected: unknown national code");
                return Err(UserError::InvalidCredentials);
            }
        };

        if !self
            .hasher
            .verify(command.password, user.password_hash)
            .await?
        {
            tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        if let Err(e) = self.store.record_login(user.id).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to record login");
        }

        Ok(user.id)
    }
}

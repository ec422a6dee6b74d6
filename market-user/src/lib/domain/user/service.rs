use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::hashing::CredentialHasher;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::CredentialStore;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    hasher: CredentialHasher,
}

impl<S> UserService<S>
where
    S: CredentialStore,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `hasher` - Password hasher shared with the authenticator
    pub fn new(store: Arc<S>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }
}

#[async_trait]
impl<S> UserServicePort for UserService<S>
where
    S: CredentialStore,
{
    async fn register(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if let Some(existing) = self
            .store
            .find_by_national_code(&command.national_code)
            .await?
        {
            if existing.is_active() {
                return Err(UserError::NationalCodeAlreadyExists(
                    command.national_code.to_string(),
                ));
            }
        }

        let password_hash = self.hasher.hash(command.password).await?;

        let user = self
            .store
            .create(NewUser {
                first_name: command.first_name,
                last_name: command.last_name,
                national_code: command.national_code,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    async fn get_profile(&self, id: UserId) -> Result<User, UserError> {
        self.store
            .find_by_id(id)
            .await?
            .filter(User::is_active)
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn update_password(&self, id: UserId, password: Password) -> Result<(), UserError> {
        let password_hash = self.hasher.hash(password).await?;

        self.store.update_password_hash(id, &password_hash).await?;

        tracing::info!(user_id = %id, "User password updated");

        Ok(())
    }

    async fn soft_delete(&self, id: UserId) -> Result<(), UserError> {
        self.store.soft_delete(id).await?;

        tracing::info!(user_id = %id, "User soft-deleted");

        Ok(())
    }
}

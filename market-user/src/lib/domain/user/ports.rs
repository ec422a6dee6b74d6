use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NationalCode;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated command containing names, national code and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `NationalCodeAlreadyExists` - An active user already owns the national code
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve an active user's profile.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is soft-deleted
    /// * `DatabaseError` - Database operation failed
    async fn get_profile(&self, id: UserId) -> Result<User, UserError>;

    /// Replace the password of an active user.
    ///
    /// # Errors
    /// * `Password` - Password hashing failed
    /// * `InvariantViolation` - The update did not affect exactly one row
    /// * `DatabaseError` - Database operation failed
    async fn update_password(&self, id: UserId, password: Password) -> Result<(), UserError>;

    /// Mark an active user as deleted.
    ///
    /// # Errors
    /// * `InvariantViolation` - The update did not affect exactly one row
    /// * `DatabaseError` - Database operation failed
    async fn soft_delete(&self, id: UserId) -> Result<(), UserError>;
}

/// Persistence operations for user credentials.
///
/// Implementations bound every call by a deadline and apply mutations
/// atomically: a failed or cancelled mutation leaves nothing visible.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Returns
    /// Created user entity with its assigned id and creation time
    ///
    /// # Errors
    /// * `NationalCodeAlreadyExists` - An active user already owns the national code
    /// * `DatabaseError` - Database operation failed
    /// * `Timeout` - Deadline elapsed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier, deleted or not.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    /// * `Timeout` - Deadline elapsed
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by national code.
    ///
    /// Prefers the active user; otherwise returns the most recently created
    /// soft-deleted one.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    /// * `Timeout` - Deadline elapsed
    async fn find_by_national_code(
        &self,
        national_code: &NationalCode,
    ) -> Result<Option<User>, UserError>;

    /// Replace the password hash of an active user.
    ///
    /// # Errors
    /// * `InvariantViolation` - Zero or several rows would be affected
    /// * `DatabaseError` - Database operation failed
    /// * `Timeout` - Deadline elapsed
    async fn update_password_hash(&self, id: UserId, password_hash: &str)
        -> Result<(), UserError>;

    /// Set the deletion timestamp of an active user.
    ///
    /// # Errors
    /// * `InvariantViolation` - Zero or several rows would be affected
    /// * `DatabaseError` - Database operation failed
    /// * `Timeout` - Deadline elapsed
    async fn soft_delete(&self, id: UserId) -> Result<(), UserError>;

    /// Stamp the last successful login.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    /// * `Timeout` - Deadline elapsed
    async fn record_login(&self, id: UserId) -> Result<(), UserError>;
}

use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::MissingFieldError;
use crate::user::errors::UserIdError;

/// Market user aggregate entity.
///
/// `password_hash` is an opaque PHC string and is never exposed to clients
/// or written to logs.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub national_code: NationalCode,
    pub password_hash: String,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Set once on soft-delete, never cleared
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("national_code", &self.national_code)
            .field("password_hash", &"<redacted>")
            .field("last_login", &self.last_login)
            .field("created_at", &self.created_at)
            .field("deleted_at", &self.deleted_at)
            .finish()
    }
}

/// User unique identifier type, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not an integer
    /// * `NotPositive` - Integer is zero or negative
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|e| UserIdError::InvalidFormat(format!("{}: {}", s, e)))?;

        if id <= 0 {
            return Err(UserIdError::NotPositive(id));
        }

        Ok(UserId(id))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn required(field: &'static str, value: String) -> Result<String, MissingFieldError> {
    if value.trim().is_empty() {
        Err(MissingFieldError { field })
    } else {
        Ok(value)
    }
}

/// National code value type: the unique natural key of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationalCode(String);

impl NationalCode {
    /// # Errors
    /// * `MissingFieldError` - Code is empty or blank
    pub fn new(code: String) -> Result<Self, MissingFieldError> {
        required("national code", code).map(|code| Self(code.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// # Arguments
    /// * `field` - Field name reported when validation fails
    /// * `name` - Raw name
    ///
    /// # Errors
    /// * `MissingFieldError` - Name is empty or blank
    pub fn new(field: &'static str, name: String) -> Result<Self, MissingFieldError> {
        required(field, name).map(|name| Self(name.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password as submitted by a client.
///
/// Lives only until it has been hashed or verified.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `MissingFieldError` - Password is empty or blank
    pub fn new(password: String) -> Result<Self, MissingFieldError> {
        required("password", password).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub national_code: NationalCode,
    pub password: Password,
}

/// Submitted login credentials
#[derive(Debug)]
pub struct LoginCommand {
    pub national_code: NationalCode,
    pub password: Password,
}

/// User record to insert; id and creation time are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub national_code: NationalCode,
    pub password_hash: String,
}

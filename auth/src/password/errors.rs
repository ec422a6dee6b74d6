use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Entropy or parameter failure while producing a hash.
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored hash could not be parsed or checked.
    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}

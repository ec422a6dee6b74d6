use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token not found in request")]
    TokenMissing,

    #[error("Token is invalid: {0}")]
    TokenInvalid(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token refresh window has expired")]
    RefreshWindowExpired,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Invalid token lookup: {0}")]
    InvalidLookup(String),
}

//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id with fixed cost parameters)
//! - Signed bearer tokens carrying a single identity claim
//! - Token lookup from headers, query strings and cookies
//!
//! Each service defines its own credential store and authorization policy
//! and builds them on top of these primitives.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenConfig, TokenService};
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", TokenConfig::default()).unwrap();
//! let issued = tokens.issue(42).unwrap();
//! let claims = tokens.verify(&issued.token).unwrap();
//! assert_eq!(claims.id, 42);
//!
//! let refreshed = tokens.refresh(&issued.token).unwrap();
//! assert_eq!(tokens.verify(&refreshed.token).unwrap().id, 42);
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::Clock;
pub use jwt::IssuedToken;
pub use jwt::JwtHandler;
pub use jwt::SystemClock;
pub use jwt::TokenConfig;
pub use jwt::TokenError;
pub use jwt::TokenLookup;
pub use jwt::TokenService;
pub use password::HashParams;
pub use password::PasswordError;
pub use password::PasswordHasher;

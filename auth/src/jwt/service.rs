use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use http::HeaderMap;
use http::Uri;

use super::claims::Claims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::TokenError;
use super::handler::JwtHandler;
use super::lookup::TokenLookup;

/// Token lifetime and transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// How long a freshly issued token verifies
    pub timeout: Duration,
    /// How long after issuance a token may be exchanged for a new one
    pub max_refresh: Duration,
    /// Where tokens are read from, in order
    pub lookup: TokenLookup,
    /// Scheme expected in front of header tokens
    pub head_name: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::hours(1),
            max_refresh: Duration::hours(1),
            lookup: TokenLookup::default(),
            head_name: "Bearer".to_string(),
        }
    }
}

/// A signed token and the instant it stops verifying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expire: DateTime<Utc>,
}

/// Issues, verifies and refreshes stateless bearer tokens.
///
/// Validity of a token moves through: valid until `timeout` after issuance,
/// then refreshable until `max_refresh` after issuance, then invalid.
pub struct TokenService {
    handler: JwtHandler,
    config: TokenConfig,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service signing with `secret`.
    ///
    /// # Errors
    /// * `MissingSecret` - The secret is empty
    pub fn new(secret: &[u8], config: TokenConfig) -> Result<Self, TokenError> {
        Ok(Self {
            handler: JwtHandler::new(secret)?,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Issue a token for `id`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, id: i64) -> Result<IssuedToken, TokenError> {
        let now = self.clock.now();
        let claims = Claims::new(id, now, self.config.timeout);

        Ok(IssuedToken {
            token: self.handler.encode(&claims)?,
            expire: now + self.config.timeout,
        })
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `TokenInvalid` - Bad format, signature or claim types
    /// * `TokenExpired` - `timeout` has elapsed since issuance
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims: Claims = self.handler.decode(token)?;

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(TokenError::TokenExpired);
        }

        Ok(claims)
    }

    /// Exchange a token for a new one.
    ///
    /// Expired tokens are accepted as long as they were issued less than
    /// `max_refresh` ago. The new token starts a new refresh window.
    ///
    /// # Errors
    /// * `TokenInvalid` - Bad format, signature or claim types
    /// * `RefreshWindowExpired` - `max_refresh` has elapsed since issuance
    pub fn refresh(&self, token: &str) -> Result<IssuedToken, TokenError> {
        let claims = self.refreshable(token)?;

        self.issue(claims.id)
    }

    /// Claims of a token that may still be exchanged, without issuing a new
    /// one. Lets callers check the identity before calling [`Self::issue`].
    ///
    /// # Errors
    /// * `TokenInvalid` - Bad format, signature or claim types
    /// * `RefreshWindowExpired` - `max_refresh` has elapsed since issuance
    pub fn refreshable(&self, token: &str) -> Result<Claims, TokenError> {
        let claims: Claims = self.handler.decode(token)?;

        if !claims.is_refreshable(self.clock.now().timestamp(), self.config.max_refresh) {
            return Err(TokenError::RefreshWindowExpired);
        }

        Ok(claims)
    }

    /// Read the token from a request using the configured lookup order.
    ///
    /// # Errors
    /// * `TokenMissing` - No configured source carries a token
    /// * `TokenInvalid` - The authorization header uses the wrong scheme
    pub fn extract(&self, headers: &HeaderMap, uri: &Uri) -> Result<String, TokenError> {
        self.config
            .lookup
            .find(headers, uri, &self.config.head_name)
    }
}

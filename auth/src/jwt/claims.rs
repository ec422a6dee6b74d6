use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Token payload.
///
/// Carries exactly one identity claim (`id`) plus timing claims, all
/// timestamps in seconds since the Unix epoch. Decoding a payload that does
/// not match this shape fails instead of yielding a partially typed value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Identity of the token owner
    pub id: i64,

    /// Issued at
    pub iat: i64,

    /// Start of the refresh window
    pub orig_iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims for `id` issued at `now`, valid for `timeout`.
    pub fn new(id: i64, now: DateTime<Utc>, timeout: Duration) -> Self {
        let issued_at = now.timestamp();

        Self {
            id,
            iat: issued_at,
            orig_iat: issued_at,
            exp: (now + timeout).timestamp(),
        }
    }

    /// Check if token is expired. A token is no longer valid at its `exp` second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    /// Check if the token may still be exchanged for a new one.
    pub fn is_refreshable(&self, current_timestamp: i64, max_refresh: Duration) -> bool {
        current_timestamp < self.orig_iat + max_refresh.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_claims() {
        let claims = Claims::new(7, issued_at(), Duration::hours(1));

        assert_eq!(claims.id, 7);
        assert_eq!(claims.iat, issued_at().timestamp());
        assert_eq!(claims.orig_iat, claims.iat);
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::new(7, issued_at(), Duration::seconds(100));
        let iat = claims.iat;

        assert!(!claims.is_expired(iat));
        assert!(!claims.is_expired(iat + 99));
        assert!(claims.is_expired(iat + 100));
        assert!(claims.is_expired(iat + 101));
    }

    #[test]
    fn test_is_refreshable() {
        let claims = Claims::new(7, issued_at(), Duration::seconds(10));
        let window = Duration::seconds(100);

        assert!(claims.is_refreshable(claims.orig_iat + 50, window));
        assert!(claims.is_refreshable(claims.orig_iat + 99, window));
        assert!(!claims.is_refreshable(claims.orig_iat + 100, window));
    }

    #[test]
    fn test_serialized_shape() {
        let claims = Claims::new(42, issued_at(), Duration::hours(1));
        let value = serde_json::to_value(claims).unwrap();

        assert_eq!(value["id"], 42);
        assert!(value["exp"].is_i64());
        assert!(value["orig_iat"].is_i64());
    }

    #[test]
    fn test_rejects_untyped_identity() {
        let result = serde_json::from_str::<Claims>(
            r#"{"id":"7","iat":1,"orig_iat":1,"exp":2}"#,
        );
        assert!(result.is_err());

        let result = serde_json::from_str::<Claims>(r#"{"iat":1,"orig_iat":1,"exp":2}"#);
        assert!(result.is_err());
    }
}

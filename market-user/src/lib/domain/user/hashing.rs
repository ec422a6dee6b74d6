use std::time::Duration;

use auth::PasswordError;
use auth::PasswordHasher;

use crate::domain::user::models::Password;
use crate::user::errors::UserError;

/// Runs password hashing off the async workers, bounded by a deadline.
#[derive(Clone)]
pub struct CredentialHasher {
    hasher: PasswordHasher,
    timeout: Duration,
}

impl CredentialHasher {
    pub fn new(hasher: PasswordHasher, timeout: Duration) -> Self {
        Self { hasher, timeout }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `Password` - Hashing failed
    /// * `Timeout` - Deadline elapsed
    pub async fn hash(&self, password: Password) -> Result<String, UserError> {
        self.run("password hashing", move |hasher| hasher.hash(password.as_str()))
            .await
    }

    /// Check a password against a stored hash.
    ///
    /// # Errors
    /// * `Password` - Stored hash is malformed
    /// * `Timeout` - Deadline elapsed
    pub async fn verify(&self, password: Password, hash: String) -> Result<bool, UserError> {
        self.run("password verification", move |hasher| {
            hasher.verify(password.as_str(), &hash)
        })
        .await
    }

    async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T, UserError>
    where
        T: Send + 'static,
        F: FnOnce(&PasswordHasher) -> Result<T, PasswordError> + Send + 'static,
    {
        let hasher = self.hasher.clone();
        let task = tokio::task::spawn_blocking(move || f(&hasher));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result.map_err(UserError::from),
            Ok(Err(e)) => Err(UserError::Unknown(format!("{} task failed: {}", operation, e))),
            Err(_) => Err(UserError::Timeout(operation.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use auth::HashParams;

    use super::*;

    fn hasher() -> CredentialHasher {
        let params = HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            ..HashParams::default()
        };
        CredentialHasher::new(
            PasswordHasher::with_params(params).unwrap(),
            Duration::from_secs(5),
        )
    }

    fn password(s: &str) -> Password {
        Password::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = hasher();

        let hash = hasher.hash(password("P@ssword")).await.unwrap();

        assert!(hasher.verify(password("P@ssword"), hash.clone()).await.unwrap());
        assert!(!hasher.verify(password("wrong"), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash() {
        let result = hasher()
            .verify(password("P@ssword"), "not-a-hash".to_string())
            .await;

        assert!(matches!(
            result,
            Err(UserError::Password(PasswordError::VerificationFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_deadline() {
        let slow = CredentialHasher::new(PasswordHasher::new(), Duration::from_nanos(1));

        let result = slow.hash(password("P@ssword")).await;
        assert!(matches!(result, Err(UserError::Timeout(_))));
    }
}

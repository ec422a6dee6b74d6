use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Fixed Argon2id cost parameters.
///
/// Chosen once at startup and shared read-only by every hashing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
    /// Salt length in bytes
    pub salt_length: usize,
    /// Derived key length in bytes
    pub key_length: usize,
}

impl HashParams {
    const MIN_SALT_LENGTH: usize = 8;
    // Largest salt that still fits a PHC salt string (64 base64 characters).
    const MAX_SALT_LENGTH: usize = 48;
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 1,
            parallelism: 2,
            salt_length: 16,
            key_length: 32,
        }
    }
}

/// Password hashing implementation.
///
/// Argon2id with fixed cost parameters and a fresh random salt per hash.
/// The salt and parameters are embedded in the PHC output, so `verify`
/// needs nothing besides the stored string.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    salt_length: usize,
}

impl PasswordHasher {
    /// Create a password hasher with the default cost parameters.
    pub fn new() -> Self {
        let params = HashParams::default();
        let argon2_params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            Some(params.key_length),
        )
        .unwrap_or_default();

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params),
            salt_length: params.salt_length,
        }
    }

    /// Create a password hasher with explicit cost parameters.
    ///
    /// # Arguments
    /// * `params` - Argon2id cost parameters
    ///
    /// # Errors
    /// * `HashingFailed` - Parameters are rejected by argon2 or the salt length is out of range
    pub fn with_params(params: HashParams) -> Result<Self, PasswordError> {
        if !(HashParams::MIN_SALT_LENGTH..=HashParams::MAX_SALT_LENGTH)
            .contains(&params.salt_length)
        {
            return Err(PasswordError::HashingFailed(format!(
                "salt length must be between {} and {} bytes, got {}",
                HashParams::MIN_SALT_LENGTH,
                HashParams::MAX_SALT_LENGTH,
                params.salt_length
            )));
        }

        let argon2_params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            Some(params.key_length),
        )
        .map_err(|e| PasswordError::HashingFailed(format!("Invalid argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params),
            salt_length: params.salt_length,
        })
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Salt generation or hashing failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = vec![0u8; self.salt_length];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| PasswordError::HashingFailed(format!("Salt generation failed: {}", e)))?;

        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid or uses unsupported parameters
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        // Parameters embedded in the hash take precedence over ours.
        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

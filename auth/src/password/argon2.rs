use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Work factor for password hashing. Raising these raises the cost of an
/// offline brute-force attack proportionally.
const MEMORY_COST_KIB: u32 = 19 * 1024;
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id with a
/// fixed work factor).
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    fn argon2(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, None)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with random salt generation.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = self.argon2()?;

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is reported as `Ok(false)`; errors are reserved for
    /// malformed stored hashes.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        // Verification reads the parameters back out of the PHC string, so
        // hashes created under an older work factor keep verifying.
        let argon2 = self.argon2()?;

        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        // Hash the password
        let hash = hasher.hash(password).expect("Failed to hash password");

        // Verify correct password
        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));

        // Verify incorrect password
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("same_password").expect("Failed to hash");
        let second = hasher.hash("same_password").expect("Failed to hash");

        assert_ne!(first, second);
    }

    #[test]
    fn test_hash_does_not_contain_plaintext() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("super_secret").expect("Failed to hash");
        assert!(!hash.contains("super_secret"));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(result.is_err());
    }
}

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::Claims;
use crate::token::TokenCodec;
use crate::token::TokenError;
use crate::token::TokenPair;

/// Authentication coordinator combining password verification and token
/// issuance.
///
/// The same issuance routine backs local login, refresh rotation, and
/// federated sign-in, so every path hands clients an identically shaped pair.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec: TokenCodec::new(jwt_secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash is malformed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and mint an access/refresh token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject_id` - Subject the tokens are bound to
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject_id: &str,
    ) -> Result<TokenPair, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.token_codec.issue_pair(subject_id)?)
    }

    /// Mint a token pair without password verification.
    ///
    /// Used by refresh rotation and federated sign-in, where the caller has
    /// already been verified by other means.
    ///
    /// # Errors
    /// * `TokenError` - Token generation failed
    pub fn issue_pair(&self, subject_id: &str) -> Result<TokenPair, TokenError> {
        self.token_codec.issue_pair(subject_id)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `TokenError` - Token validation or decoding failed
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_codec.verify(token)
    }
}

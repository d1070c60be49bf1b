use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Serialize;

use super::claims::Claims;
use super::claims::TokenKind;
use super::errors::TokenError;

/// Signs and verifies identity tokens.
///
/// Holds the process-wide symmetric signing secret; nothing else in the
/// system touches the secret directly. Uses HS256 (HMAC with SHA-256).
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

/// Access/refresh token pair issued on every successful sign-in or rotation.
///
/// Serialized with camelCase field names for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenCodec {
    /// Create a new codec with a signing secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a signed token for a subject.
    ///
    /// The expiry is now plus the TTL of `kind`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject_id: &str, kind: TokenKind) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);
        let claims = Claims::new(subject_id, kind);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Issue a fresh access/refresh pair for a subject.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_pair(&self, subject_id: &str) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue(subject_id, TokenKind::Access)?,
            refresh_token: self.issue(subject_id, TokenKind::Refresh)?,
        })
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// # Errors
    /// * `Expired` - Signature is valid but the expiry is in the past
    /// * `Invalid` - Signature is invalid or the token is malformed
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(self.algorithm);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

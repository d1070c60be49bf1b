//! Authentication utilities library
//!
//! Provides the credential infrastructure for the identity service:
//! - Password hashing (Argon2id, fixed work factor)
//! - Signed access/refresh token issuance and verification
//! - Authentication coordination (verify password, mint token pair)
//!
//! The service crate defines its own repository ports and adapts these
//! implementations, keeping this crate free of any persistence or transport
//! concerns.
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
//! use auth::{TokenCodec, TokenKind};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let token = codec.issue("user123", TokenKind::Access).unwrap();
//! let claims = codec.verify(&token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify password and mint an access/refresh pair
//! let pair = auth.authenticate("password123", &hash, "user123").unwrap();
//!
//! // Gate a request: verify the presented access token
//! let claims = auth.verify_token(&pair.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenKind;
pub use token::TokenPair;

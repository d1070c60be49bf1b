use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Username contains invalid characters")]
    InvalidCharacters,
}

/// Top-level error for all credential-lifecycle operations.
///
/// `UserNotFound` and `InvalidCredentials` stay distinct here so the server
/// can log the true cause; the HTTP layer collapses both into one outward
/// "invalid credentials" outcome to prevent username enumeration.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    // Domain-level errors
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    TokenInvalid(String),

    #[error("Missing credential")]
    MissingCredential,

    // Infrastructure errors; detail is for server-side diagnostics only
    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        AuthError::Hashing(err.to_string())
    }
}

impl From<auth::TokenError> for AuthError {
    fn from(err: auth::TokenError) -> Self {
        match err {
            auth::TokenError::Expired => AuthError::TokenExpired,
            auth::TokenError::Invalid(msg) => AuthError::TokenInvalid(msg),
            auth::TokenError::EncodingFailed(msg) => AuthError::Infrastructure(msg),
        }
    }
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => e.into(),
            auth::AuthenticationError::TokenError(e) => e.into(),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Infrastructure(err.to_string())
    }
}

use thiserror::Error;

/// Error type for token operations.
///
/// `Expired` and `Invalid` are deliberately distinct: an expired refresh
/// token is the expected trigger for re-login, while an invalid token means
/// tampering or misuse and is never a recoverable condition.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),
}

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Validity window for access tokens, presented on every protected request.
pub const ACCESS_TTL_MINUTES: i64 = 15;

/// Validity window for refresh tokens, presented only to mint new pairs.
pub const REFRESH_TTL_DAYS: i64 = 7;

/// Role a token plays in the two-tier scheme.
///
/// Access tokens are short-lived and cheap to present; refresh tokens are
/// long-lived and exchanged for fresh pairs, bounding the blast radius of a
/// leaked access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Lifetime granted to tokens of this kind at issuance.
    pub fn ttl(&self) -> Duration {
        match self {
            TokenKind::Access => Duration::minutes(ACCESS_TTL_MINUTES),
            TokenKind::Refresh => Duration::days(REFRESH_TTL_DAYS),
        }
    }
}

/// Signed token payload.
///
/// Every field is mandatory; tokens with a free-form or partial claim set are
/// rejected at decode time rather than interpreted loosely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Access or refresh
    pub kind: TokenKind,
}

impl Claims {
    /// Create claims for a subject with the expiry implied by `kind`.
    pub fn new(subject_id: impl ToString, kind: TokenKind) -> Self {
        let now = Utc::now();
        let expiration = now + kind.ttl();

        Self {
            sub: subject_id.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            kind,
        }
    }

    /// Check if the token is expired at the given instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

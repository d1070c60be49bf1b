use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::identity::errors::UserIdError;
use crate::identity::errors::UsernameError;

/// User aggregate entity.
///
/// An account is usable only if it carries at least one credential: a local
/// password hash, a federated identity, or both. The constructors below are
/// the only way to build one, so that invariant holds by construction.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    /// Present only for accounts that registered locally.
    pub password_hash: Option<String>,
    /// Provider-qualified external subject id (`provider:subject`).
    pub federated_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a locally registered user from an already-hashed password.
    pub fn local(username: Username, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            username,
            password_hash: Some(password_hash),
            federated_id: None,
            created_at: Utc::now(),
        }
    }

    /// Build an auto-provisioned federated user with no local password.
    pub fn federated(username: Username, federated_id: String) -> Self {
        Self {
            id: UserId::new(),
            username,
            password_hash: None,
            federated_id: Some(federated_id),
            created_at: Utc::now(),
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures the handle is 3-64 characters. Spaces and periods are allowed so
/// that federated display names ("Ada Lovelace") can be used as a fallback
/// handle when auto-provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 64 characters
    /// * `InvalidCharacters` - Contains characters outside the allowed set
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.len();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.' || c == ' ')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a local account.
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(username: Username, password: String) -> Self {
        Self { username, password }
    }
}

/// Command to change an authenticated user's password.
///
/// The caller's identity comes from the session guard, never from this
/// command.
#[derive(Debug)]
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: String,
}

/// Profile handed back by an external identity provider after it has
/// independently verified the user.
#[derive(Debug, Clone)]
pub struct FederatedProfile {
    pub provider: String,
    pub subject_id: String,
    pub display_name: String,
}

impl FederatedProfile {
    /// Provider-qualified identifier stored on the user row.
    ///
    /// Qualifying with the provider keeps subject ids from distinct
    /// providers from colliding.
    pub fn federated_id(&self) -> String {
        format!("{}:{}", self.provider, self.subject_id)
    }
}

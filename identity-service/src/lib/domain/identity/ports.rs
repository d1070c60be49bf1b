use async_trait::async_trait;
use auth::TokenPair;

use crate::identity::errors::AuthError;
use crate::identity::models::ChangePasswordCommand;
use crate::identity::models::FederatedProfile;
use crate::identity::models::RegisterCommand;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::models::Username;

/// Port for the credential-lifecycle service.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new local account.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `Hashing` - Password hashing failed
    /// * `Infrastructure` - Record store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Verify local credentials and issue an access/refresh token pair.
    ///
    /// # Errors
    /// * `UserNotFound` - No account with this username
    /// * `InvalidCredentials` - Password mismatch, or no local password set
    /// * `Infrastructure` - Record store operation failed
    async fn login(&self, username: &Username, password: &str) -> Result<TokenPair, AuthError>;

    /// Exchange a refresh token for a brand-new pair (unconditional
    /// rotation; the presented token is not tracked server-side).
    ///
    /// # Errors
    /// * `TokenExpired` - Refresh token has expired; client must re-login
    /// * `TokenInvalid` - Malformed, tampered, or not a refresh token
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Re-verify the current password, then overwrite the stored hash.
    ///
    /// Outstanding tokens are not invalidated.
    ///
    /// # Errors
    /// * `UserNotFound` - No account with this id
    /// * `InvalidCredentials` - Current password mismatch, or no local password
    /// * `Hashing` - Password hashing failed
    /// * `Infrastructure` - Record store operation failed
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), AuthError>;

    /// Resolve a provider-verified profile to a local user, provisioning one
    /// on first sight, and issue a token pair shaped exactly like login's.
    ///
    /// # Errors
    /// * `InvalidUsername` - Provider display name unusable as a handle
    /// * `Infrastructure` - Record store operation failed
    async fn federated_sign_in(
        &self,
        profile: FederatedProfile,
    ) -> Result<(User, TokenPair), AuthError>;

    /// Stateless no-op: tokens are not tracked server-side, so there is
    /// nothing to revoke. The client is expected to discard its pair.
    fn logout(&self);
}

/// Persistence operations for the user aggregate (the record store port).
///
/// Uniqueness of `username` and `federated_id` is the store's job; `create`
/// reports a constraint violation rather than relying on a prior lookup, so
/// concurrent registrations race safely.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `Infrastructure` - Record store operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `Infrastructure` - Record store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    /// Retrieve a user by username.
    ///
    /// # Errors
    /// * `Infrastructure` - Record store operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;

    /// Retrieve a user by provider-qualified federated identifier.
    ///
    /// # Errors
    /// * `Infrastructure` - Record store operation failed
    async fn find_by_federated_id(&self, federated_id: &str) -> Result<Option<User>, AuthError>;

    /// Overwrite a user's stored password hash.
    ///
    /// # Errors
    /// * `UserNotFound` - No row with this id
    /// * `Infrastructure` - Record store operation failed
    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), AuthError>;
}

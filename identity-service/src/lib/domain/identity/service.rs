use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenKind;
use auth::TokenPair;

use crate::identity::errors::AuthError;
use crate::identity::models::ChangePasswordCommand;
use crate::identity::models::FederatedProfile;
use crate::identity::models::RegisterCommand;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::models::Username;
use crate::identity::ports::IdentityServicePort;
use crate::identity::ports::UserRepository;

/// Credential gateway: orchestrates registration, login, rotation, password
/// change, and federated sign-in against the record store port.
///
/// Stateless between requests; the only shared state is the signing secret
/// inside the injected `Authenticator`, which is read-only after startup.
pub struct IdentityService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
}

impl<R> IdentityService<R>
where
    R: UserRepository,
{
    /// Create a new identity service with injected dependencies.
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<R> IdentityServicePort for IdentityService<R>
where
    R: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        let password_hash = self.authenticator.hash_password(&command.password)?;

        let user = User::local(command.username, password_hash);

        // Duplicate detection is the store's unique constraint, not a prior
        // lookup, so concurrent registrations of the same name race safely.
        let created_user = self.repository.create(user).await?;

        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(&self, username: &Username, password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        // Federated-only accounts have no local password to check.
        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        let pair = self
            .authenticator
            .authenticate(password, stored_hash, &user.id.to_string())?;

        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.authenticator.verify_token(refresh_token)?;

        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::TokenInvalid(
                "not a refresh token".to_string(),
            ));
        }

        // Unconditional rotation: the presented token stays valid until its
        // own expiry because nothing is tracked server-side.
        Ok(self.authenticator.issue_pair(&claims.sub)?)
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), AuthError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(id.to_string()))?;

        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        let is_valid = self
            .authenticator
            .verify_password(&command.current_password, stored_hash)?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let new_hash = self.authenticator.hash_password(&command.new_password)?;
        self.repository.update_password_hash(id, &new_hash).await?;

        tracing::info!(user_id = %id, "Password changed");

        Ok(())
    }

    async fn federated_sign_in(
        &self,
        profile: FederatedProfile,
    ) -> Result<(User, TokenPair), AuthError> {
        let federated_id = profile.federated_id();

        let user = match self.repository.find_by_federated_id(&federated_id).await? {
            Some(user) => user,
            None => {
                // Auto-provision with the provider display name as the
                // handle. A same-named local account is not merged; that is
                // a confirmed product decision, not an oversight.
                let username = Username::new(profile.display_name.clone())?;
                let user = self
                    .repository
                    .create(User::federated(username, federated_id))
                    .await?;
                tracing::info!(
                    user_id = %user.id,
                    provider = %profile.provider,
                    "Federated user provisioned"
                );
                user
            }
        };

        let pair = self.authenticator.issue_pair(&user.id.to_string())?;

        Ok((user, pair))
    }

    fn logout(&self) {
        // Tokens are stateless and untracked; the client discards its pair.
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;

    const TEST_SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, AuthError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;
            async fn find_by_federated_id(&self, federated_id: &str) -> Result<Option<User>, AuthError>;
            async fn update_password_hash(&self, id: &UserId, password_hash: &str) -> Result<(), AuthError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(TEST_SECRET))
    }

    fn local_user(username: &str, password: &str) -> User {
        let hash = Authenticator::new(TEST_SECRET)
            .hash_password(password)
            .unwrap();
        User::local(Username::new(username.to_string()).unwrap(), hash)
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.password_hash
                    .as_deref()
                    .is_some_and(|h| h.starts_with("$argon2") && !h.contains("password123"))
                    && user.federated_id.is_none()
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let command = RegisterCommand::new(
            Username::new("alice".to_string()).unwrap(),
            "password123".to_string(),
        );

        let user = service.register(command).await.unwrap();
        assert_eq!(user.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_create().times(1).returning(|user| {
            Err(AuthError::DuplicateUsername(
                user.username.as_str().to_string(),
            ))
        });

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let command = RegisterCommand::new(
            Username::new("alice".to_string()).unwrap(),
            "pw2".to_string(),
        );

        let result = service.register(command).await;
        assert!(matches!(result, Err(AuthError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_login_success_issues_verifiable_pair() {
        let mut repository = MockTestUserRepository::new();

        let user = local_user("alice", "password123");
        let user_id = user.id;
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let authenticator = authenticator();
        let service = IdentityService::new(Arc::new(repository), Arc::clone(&authenticator));

        let username = Username::new("alice".to_string()).unwrap();
        let pair = service.login(&username, "password123").await.unwrap();

        let access = authenticator.verify_token(&pair.access_token).unwrap();
        let refresh = authenticator.verify_token(&pair.refresh_token).unwrap();
        assert_eq!(access.sub, user_id.to_string());
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(refresh.sub, user_id.to_string());
        assert_eq!(refresh.kind, TokenKind::Refresh);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestUserRepository::new();

        let user = local_user("alice", "password123");
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let username = Username::new("alice".to_string()).unwrap();
        let result = service.login(&username, "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let username = Username::new("ghost".to_string()).unwrap();
        let result = service.login(&username, "anything").await;
        assert!(matches!(result, Err(AuthError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_login_federated_only_account() {
        let mut repository = MockTestUserRepository::new();

        let user = User::federated(
            Username::new("Ada Lovelace".to_string()).unwrap(),
            "google:123".to_string(),
        );
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let username = Username::new("Ada Lovelace".to_string()).unwrap();
        let result = service.login(&username, "anything").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_rotates_pair_for_same_subject() {
        let repository = MockTestUserRepository::new();
        let authenticator = authenticator();
        let service = IdentityService::new(Arc::new(repository), Arc::clone(&authenticator));

        let subject = UserId::new().to_string();
        let original = authenticator.issue_pair(&subject).unwrap();

        let rotated = service.refresh(&original.refresh_token).await.unwrap();

        let access = authenticator.verify_token(&rotated.access_token).unwrap();
        assert_eq!(access.sub, subject);
        assert_eq!(access.kind, TokenKind::Access);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let repository = MockTestUserRepository::new();
        let authenticator = authenticator();
        let service = IdentityService::new(Arc::new(repository), Arc::clone(&authenticator));

        let pair = authenticator.issue_pair("user123").unwrap();

        let result = service.refresh(&pair.access_token).await;
        assert!(matches!(result, Err(AuthError::TokenInvalid(_))));
    }

    #[tokio::test]
    async fn test_refresh_rejects_garbage() {
        let repository = MockTestUserRepository::new();
        let service = IdentityService::new(Arc::new(repository), authenticator());

        let result = service.refresh("invalid.token.here").await;
        assert!(matches!(result, Err(AuthError::TokenInvalid(_))));
    }

    #[tokio::test]
    async fn test_change_password_wrong_current_leaves_hash() {
        let mut repository = MockTestUserRepository::new();

        let user = local_user("alice", "old_password");
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_update_password_hash().times(0);

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let command = ChangePasswordCommand {
            current_password: "wrong".to_string(),
            new_password: "new_password".to_string(),
        };

        let result = service.change_password(&user_id, command).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_change_password_success_overwrites_hash() {
        let mut repository = MockTestUserRepository::new();

        let user = local_user("alice", "old_password");
        let user_id = user.id;
        let old_hash = user.password_hash.clone().unwrap();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update_password_hash()
            .withf(move |id, hash| {
                *id == user_id && hash.starts_with("$argon2") && hash != old_hash
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let command = ChangePasswordCommand {
            current_password: "old_password".to_string(),
            new_password: "new_password".to_string(),
        };

        let result = service.change_password(&user_id, command).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_federated_sign_in_provisions_once() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_federated_id()
            .withf(|federated_id| federated_id == "google:12345")
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.federated_id.as_deref() == Some("google:12345")
                    && user.password_hash.is_none()
                    && user.username.as_str() == "Ada Lovelace"
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = IdentityService::new(Arc::new(repository), authenticator());

        let profile = FederatedProfile {
            provider: "google".to_string(),
            subject_id: "12345".to_string(),
            display_name: "Ada Lovelace".to_string(),
        };

        let (user, _pair) = service.federated_sign_in(profile).await.unwrap();
        assert_eq!(user.username.as_str(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_federated_sign_in_resolves_existing_user() {
        let mut repository = MockTestUserRepository::new();

        let existing = User::federated(
            Username::new("Ada Lovelace".to_string()).unwrap(),
            "google:12345".to_string(),
        );
        let existing_id = existing.id;
        repository
            .expect_find_by_federated_id()
            .withf(|federated_id| federated_id == "google:12345")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let authenticator = authenticator();
        let service = IdentityService::new(Arc::new(repository), Arc::clone(&authenticator));

        let profile = FederatedProfile {
            provider: "google".to_string(),
            subject_id: "12345".to_string(),
            display_name: "Ada Lovelace".to_string(),
        };

        let (user, pair) = service.federated_sign_in(profile).await.unwrap();
        assert_eq!(user.id, existing_id);

        let claims = authenticator.verify_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, existing_id.to_string());
    }
}

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use identity_service::identity::errors::AuthError;
use identity_service::identity::models::User;
use identity_service::identity::models::UserId;
use identity_service::identity::models::Username;
use identity_service::identity::ports::UserRepository;
use identity_service::identity::service::IdentityService;
use identity_service::inbound::http::router::create_router;

pub const TEST_JWT_SECRET: &[u8] = b"integration_test_secret_32_bytes_ok!";

/// In-memory record store standing in for Postgres, with the same
/// uniqueness contract the real table enforces.
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::DuplicateUsername(
                user.username.as_str().to_string(),
            ));
        }
        if user.federated_id.is_some()
            && users.iter().any(|u| u.federated_id == user.federated_id)
        {
            return Err(AuthError::Infrastructure(
                "federated id already exists".to_string(),
            ));
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == *username).cloned())
    }

    async fn find_by_federated_id(&self, federated_id: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.federated_id.as_deref() == Some(federated_id))
            .cloned())
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == *id) {
            Some(user) => {
                user.password_hash = Some(password_hash.to_string());
                Ok(())
            }
            None => Err(AuthError::UserNotFound(id.to_string())),
        }
    }
}

/// Test application that spawns a real server on a random port
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub repository: Arc<InMemoryUserRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(TEST_JWT_SECRET));
        let repository = Arc::new(InMemoryUserRepository::new());
        let identity_service = Arc::new(IdentityService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));

        let router = create_router(identity_service, Arc::clone(&authenticator));

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Server crashed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            repository,
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Register a user and return the login token pair.
    pub async fn register_and_login(
        &self,
        username: &str,
        password: &str,
    ) -> (String, String) {
        let response = self
            .post("/api/auth/register")
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());

        let response = self
            .post("/api/auth/login")
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        (
            body["data"]["accessToken"].as_str().unwrap().to_string(),
            body["data"]["refreshToken"].as_str().unwrap().to_string(),
        )
    }
}

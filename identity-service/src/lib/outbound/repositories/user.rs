use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::identity::errors::AuthError;
use crate::identity::models::User;
use crate::identity::models::UserId;
use crate::identity::models::Username;
use crate::identity::ports::UserRepository;

/// Record store adapter backed by Postgres.
///
/// Uniqueness of usernames and federated ids is enforced by the table's
/// constraints; violation of either is surfaced through the domain error.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn infra(e: sqlx::Error) -> AuthError {
    AuthError::Infrastructure(e.to_string())
}

fn row_to_user(row: &PgRow) -> Result<User, AuthError> {
    Ok(User {
        id: UserId(row.try_get("id").map_err(infra)?),
        username: Username::new(row.try_get("username").map_err(infra)?)?,
        password_hash: row.try_get("password_hash").map_err(infra)?,
        federated_id: row.try_get("federated_id").map_err(infra)?,
        created_at: row.try_get("created_at").map_err(infra)?,
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, federated_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.password_hash.as_deref())
        .bind(user.federated_id.as_deref())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("users_username_key")
                {
                    return AuthError::DuplicateUsername(user.username.as_str().to_string());
                }
            }
            AuthError::Infrastructure(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, federated_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, federated_id, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_federated_id(&self, federated_id: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, federated_id, created_at
            FROM users
            WHERE federated_id = $1
            "#,
        )
        .bind(federated_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(infra)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound(id.to_string()));
        }

        Ok(())
    }
}

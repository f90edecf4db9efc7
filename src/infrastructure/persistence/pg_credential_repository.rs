//! PostgreSQL implementation of the credential repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Subject;
use crate::domain::repositories::CredentialRepository;
use crate::error::AppError;

/// Checks credentials against bcrypt hashes stored in `users.password_hash`.
///
/// Hash comparison is delegated to `pgcrypto`'s `crypt()`, so the password
/// hashing scheme stays a database concern.
pub struct PgCredentialRepository {
    pool: Arc<PgPool>,
}

impl PgCredentialRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for PgCredentialRepository {
    async fn verify(&self, email: &str, password: &str) -> Result<Option<Subject>, AppError> {
        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT user_id
            FROM users
            WHERE email = $1
              AND password_hash = crypt($2, password_hash)
            "#,
        )
        .bind(email)
        .bind(password)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user_id)
    }

    async fn record_login(&self, user_id: Subject) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}

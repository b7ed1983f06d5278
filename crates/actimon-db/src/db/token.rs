use actimon_core::AppError;
use sqlx::{PgPool, Postgres};

/// Durable `token -> used` mapping.
///
/// A token is either absent, present and unused, or present and used. `mark_used` is the
/// only way to move a token from unused to used, and it never moves back.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    async fn exists(&self, token: &str) -> Result<bool, AppError>;

    /// Fails with `NotFound` when the token was never issued.
    async fn is_used(&self, token: &str) -> Result<bool, AppError>;

    /// Fails with `AlreadyExists` when the token is already stored.
    async fn insert(&self, token: &str) -> Result<(), AppError>;

    /// Atomically flip `used` from false to true.
    ///
    /// Returns `true` only for the single caller that performed the transition; every
    /// other caller gets `false`. Fails with `NotFound` when the token was never issued.
    async fn mark_used(&self, token: &str) -> Result<bool, AppError>;
}

pub(crate) fn token_not_found() -> AppError {
    AppError::NotFound("This token does not exist.".to_string())
}

/// PostgreSQL-backed token store
#[derive(Clone)]
pub struct PostgresTokenStore {
    pool: PgPool,
}

impl PostgresTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TokenStore for PostgresTokenStore {
    #[tracing::instrument(skip(self, token), fields(db.table = "registration_tokens", db.operation = "select"))]
    async fn exists(&self, token: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM registration_tokens WHERE token = $1)",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self, token), fields(db.table = "registration_tokens", db.operation = "select"))]
    async fn is_used(&self, token: &str) -> Result<bool, AppError> {
        let used = sqlx::query_scalar::<Postgres, bool>(
            "SELECT used FROM registration_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        used.ok_or_else(token_not_found)
    }

    #[tracing::instrument(skip(self, token), fields(db.table = "registration_tokens", db.operation = "insert"))]
    async fn insert(&self, token: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO registration_tokens (token, used)
            VALUES ($1, FALSE)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::AlreadyExists("Token already exists.".to_string()));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, token), fields(db.table = "registration_tokens", db.operation = "update"))]
    async fn mark_used(&self, token: &str) -> Result<bool, AppError> {
        // Conditional update; the affected-row count decides who performed the transition.
        let result = sqlx::query(
            r#"
            UPDATE registration_tokens
            SET used = TRUE, used_at = NOW()
            WHERE token = $1 AND used = FALSE
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        if self.exists(token).await? {
            Ok(false)
        } else {
            Err(token_not_found())
        }
    }
}

use actimon_core::{
    models::{NewUser, User, UserUpdate},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// User record store. Reads and updates of a missing user fail with `NotFound`.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    async fn get_by_email(&self, email: &str) -> Result<User, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<User, AppError>;

    async fn get_id_by_email(&self, email: &str) -> Result<Uuid, AppError>;

    async fn update_by_email(&self, email: &str, update: UserUpdate) -> Result<User, AppError>;

    async fn delete_by_email(&self, email: &str) -> Result<(), AppError>;
}

pub(crate) fn user_not_found() -> AppError {
    AppError::NotFound("User does not exist.".to_string())
}

pub(crate) fn email_taken(email: &str) -> AppError {
    AppError::Conflict(format!("A user with email {} already exists.", email))
}

fn map_unique_violation(err: sqlx::Error, email: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => email_taken(email),
        _ => AppError::Database(err),
    }
}

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, roles, created_at, updated_at";

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(skip(self, user), fields(db.table = "users", db.operation = "insert"))]
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let query = format!(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, roles)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<Postgres, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.roles)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &user.email))
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let query = format!("SELECT {} FROM users ORDER BY created_at ASC", USER_COLUMNS);
        let users = sqlx::query_as::<Postgres, User>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        sqlx::query_as::<Postgres, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(user_not_found)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select", db.record_id = %id))]
    async fn get_by_id(&self, id: Uuid) -> Result<User, AppError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<Postgres, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(user_not_found)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn get_id_by_email(&self, email: &str) -> Result<Uuid, AppError> {
        sqlx::query_scalar::<Postgres, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(user_not_found)
    }

    #[tracing::instrument(skip(self, update), fields(db.table = "users", db.operation = "update"))]
    async fn update_by_email(&self, email: &str, update: UserUpdate) -> Result<User, AppError> {
        let new_email = update.email.clone().unwrap_or_else(|| email.to_string());
        let query = format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                roles = COALESCE($6, roles),
                updated_at = NOW()
            WHERE email = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<Postgres, User>(&query)
            .bind(email)
            .bind(update.first_name)
            .bind(update.last_name)
            .bind(update.email)
            .bind(update.password_hash)
            .bind(update.roles)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &new_email))?
            .ok_or_else(user_not_found)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "delete"))]
    async fn delete_by_email(&self, email: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(user_not_found());
        }

        Ok(())
    }
}

//! User management on top of a `UserStore`
//!
//! Passwords are hashed with argon2 here, so stores only ever see PHC strings.

use std::sync::Arc;

use actimon_core::{
    models::{CreateUserRequest, NewUser, UpdateUserRequest, User, UserUpdate},
    AppError,
};
use actimon_db::UserStore;
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use rand_core::OsRng;
use uuid::Uuid;

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, request), fields(user.email = %request.email))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, AppError> {
        let password_hash = hash_password(&request.password)?;
        let user = self
            .store
            .create_user(NewUser {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                password_hash,
                roles: request.roles.unwrap_or_default(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.store.list_users().await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        self.store.get_by_email(email).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<User, AppError> {
        self.store.get_by_id(id).await
    }

    pub async fn get_id_by_email(&self, email: &str) -> Result<Uuid, AppError> {
        self.store.get_id_by_email(email).await
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn update(&self, email: &str, request: UpdateUserRequest) -> Result<User, AppError> {
        let password_hash = match request.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        self.store
            .update_by_email(
                email,
                UserUpdate {
                    first_name: request.first_name,
                    last_name: request.last_name,
                    email: request.email,
                    password_hash,
                    roles: request.roles,
                },
            )
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, email: &str) -> Result<(), AppError> {
        self.store.delete_by_email(email).await
    }
}

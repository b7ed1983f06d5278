//! In-memory stores
//!
//! Used with `STORE_BACKEND=memory` and by the HTTP integration tests. The mutex is held
//! only for the map operation itself.

use std::collections::HashMap;
use std::sync::Arc;

use actimon_core::{
    models::{NewUser, User, UserUpdate},
    AppError,
};
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::token::{token_not_found, TokenStore};
use super::user::{email_taken, user_not_found, UserStore};

#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<Mutex<HashMap<String, bool>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn exists(&self, token: &str) -> Result<bool, AppError> {
        Ok(self.tokens.lock().await.contains_key(token))
    }

    async fn is_used(&self, token: &str) -> Result<bool, AppError> {
        self.tokens
            .lock()
            .await
            .get(token)
            .copied()
            .ok_or_else(token_not_found)
    }

    async fn insert(&self, token: &str) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().await;
        if tokens.contains_key(token) {
            return Err(AppError::AlreadyExists("Token already exists.".to_string()));
        }
        tokens.insert(token.to_string(), false);
        Ok(())
    }

    async fn mark_used(&self, token: &str) -> Result<bool, AppError> {
        let mut tokens = self.tokens.lock().await;
        match tokens.get_mut(token) {
            Some(used) if !*used => {
                *used = true;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(token_not_found()),
        }
    }
}

/// Users keyed by email
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<String, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&user.email) {
            return Err(email_taken(&user.email));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.email.clone(), created.clone());
        Ok(created)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.lock().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users
            .lock()
            .await
            .get(email)
            .cloned()
            .ok_or_else(user_not_found)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .lock()
            .await
            .values()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(user_not_found)
    }

    async fn get_id_by_email(&self, email: &str) -> Result<Uuid, AppError> {
        self.get_by_email(email).await.map(|u| u.id)
    }

    async fn update_by_email(&self, email: &str, update: UserUpdate) -> Result<User, AppError> {
        let mut users = self.users.lock().await;
        if let Some(new_email) = update.email.as_deref() {
            if new_email != email && users.contains_key(new_email) {
                return Err(email_taken(new_email));
            }
        }

        let mut user = users.remove(email).ok_or_else(user_not_found)?;
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(new_email) = update.email {
            user.email = new_email;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(roles) = update.roles {
            user.roles = roles;
        }
        user.updated_at = Utc::now();

        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn delete_by_email(&self, email: &str) -> Result<(), AppError> {
        self.users
            .lock()
            .await
            .remove(email)
            .map(|_| ())
            .ok_or_else(user_not_found)
    }
}

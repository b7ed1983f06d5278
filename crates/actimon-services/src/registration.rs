//! Registration completion: consume an invitation token, then create the user it names.

use std::sync::Arc;

use actimon_core::{
    models::{CreateUserRequest, RegisterRequest, User},
    AppError,
};

use crate::token::TokenLifecycleService;
use crate::users::UserService;

#[derive(Clone)]
pub struct RegistrationService {
    tokens: Arc<TokenLifecycleService>,
    users: Arc<UserService>,
}

impl RegistrationService {
    pub fn new(tokens: Arc<TokenLifecycleService>, users: Arc<UserService>) -> Self {
        Self { tokens, users }
    }

    /// The token is consumed before the user is created, so a replayed token can never
    /// create a second user.
    #[tracing::instrument(skip_all)]
    pub async fn register(&self, token: &str, request: RegisterRequest) -> Result<User, AppError> {
        let claims = self.tokens.consume(token).await?;

        self.users
            .create(CreateUserRequest {
                first_name: request.first_name,
                last_name: request.last_name,
                email: claims.email,
                password: request.password,
                roles: Some(vec![claims.role]),
            })
            .await
    }
}

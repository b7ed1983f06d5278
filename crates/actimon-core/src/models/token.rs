use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Claim set embedded in a signed registration token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub email: String,
    pub role: String,
    /// Absolute expiry as unix seconds
    pub exp: i64,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp < now.timestamp()
    }
}

/// Request to issue a registration token and send the invitation
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct IssueTokenRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 64,
        message = "Role must be between 1 and 64 characters"
    ))]
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IssuedToken {
    pub token: String,
}

/// Body of a registration completed with a token
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "First name must be between 1 and 255 characters"
    ))]
    pub first_name: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Last name must be between 1 and 255 characters"
    ))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

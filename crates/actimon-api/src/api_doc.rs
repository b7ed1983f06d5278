//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use actimon_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Actimon API",
        description = "Invitation-based user registration and measurement ingestion for activity monitoring."
    ),
    paths(
        handlers::health::health_check,
        handlers::tokens::issue_token,
        handlers::tokens::validate_token,
        handlers::users::register_with_token,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::get_user_email_by_id,
        handlers::users::get_user_id_by_email,
        handlers::measurements::upload_measurements,
    ),
    components(
        schemas(
            models::IssueTokenRequest,
            models::IssuedToken,
            models::Claims,
            models::RegisterRequest,
            models::User,
            models::CreateUserRequest,
            models::UpdateUserRequest,
            models::UserEmail,
            models::UserId,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "tokens", description = "Registration token issuance and validation"),
        (name = "users", description = "User management and registration completion"),
        (name = "measurements", description = "Measurement file ingestion"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

//! User routes, including registration completion with a token

use std::sync::Arc;

use actimon_core::{
    models::{CreateUserRequest, RegisterRequest, UpdateUserRequest, User, UserEmail, UserId},
    AppError,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Status and message contract of `POST /users/by-token/{token}`: unknown tokens are 404,
/// everything else is 400.
fn registration_error(err: AppError) -> HttpAppError {
    if err.is_unknown_token() {
        return HttpAppError::from(err)
            .with_status(StatusCode::NOT_FOUND)
            .with_message("Token does not exist.");
    }

    match err {
        AppError::AlreadyUsed => HttpAppError::from(err)
            .with_status(StatusCode::BAD_REQUEST)
            .with_message("This token has already been registered."),
        other => HttpAppError::from(other).with_status(StatusCode::BAD_REQUEST),
    }
}

/// Complete a registration: consume the token and create the user it names.
#[utoipa::path(
    post,
    path = "/users/by-token/{token}",
    tag = "users",
    params(("token" = String, Path, description = "Registration token")),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Token already registered, expired, or invalid body", body = ErrorResponse),
        (status = 404, description = "Token does not exist", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register_with_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    payload: Result<ValidatedJson<RegisterRequest>, HttpAppError>,
) -> Result<ApiResponse<User>, HttpAppError> {
    let ValidatedJson(request) =
        payload.map_err(|e| e.with_status(StatusCode::BAD_REQUEST))?;

    let user = state
        .registration
        .register(&token, request)
        .await
        .map_err(registration_error)?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        "User successfully registered!",
        user,
    ))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses((status = 200, description = "All users", body = [User]))
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Vec<User>>, HttpAppError> {
    let users = state.users.list().await?;
    Ok(ApiResponse::new(StatusCode::OK, "Users retrieved.", users))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "User could not be created", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<ValidatedJson<CreateUserRequest>, HttpAppError>,
) -> Result<ApiResponse<User>, HttpAppError> {
    let conflict = |e: HttpAppError| e.with_status(StatusCode::CONFLICT);

    let ValidatedJson(request) = payload.map_err(conflict)?;
    let user = state
        .users
        .create(request)
        .await
        .map_err(|e| conflict(e.into()))?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        "User successfully created!",
        user,
    ))
}

#[utoipa::path(
    get,
    path = "/users/{email}",
    tag = "users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User does not exist", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<ApiResponse<User>, HttpAppError> {
    let user = state.users.get_by_email(&email).await?;
    Ok(ApiResponse::new(StatusCode::OK, "User retrieved.", user))
}

#[utoipa::path(
    put,
    path = "/users/{email}",
    tag = "users",
    params(("email" = String, Path, description = "User email")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 404, description = "User does not exist", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<ApiResponse<User>, HttpAppError> {
    let user = state.users.update(&email, request).await?;
    Ok(ApiResponse::new(
        StatusCode::OK,
        "User successfully updated!",
        user,
    ))
}

#[utoipa::path(
    delete,
    path = "/users/{email}",
    tag = "users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User does not exist", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<ApiResponse<serde_json::Map<String, serde_json::Value>>, HttpAppError> {
    state.users.delete(&email).await?;
    Ok(ApiResponse::empty(
        StatusCode::NO_CONTENT,
        "User successfully deleted!",
    ))
}

#[utoipa::path(
    get,
    path = "/users/id/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Email of the user", body = UserEmail),
        (status = 404, description = "User does not exist", body = ErrorResponse)
    )
)]
pub async fn get_user_email_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<UserEmail>, HttpAppError> {
    let user = state.users.get_by_id(id).await?;
    Ok(ApiResponse::new(
        StatusCode::OK,
        "User retrieved.",
        UserEmail { email: user.email },
    ))
}

#[utoipa::path(
    get,
    path = "/users/{email}/id",
    tag = "users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "ID of the user", body = UserId),
        (status = 404, description = "User does not exist", body = ErrorResponse)
    )
)]
pub async fn get_user_id_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<ApiResponse<UserId>, HttpAppError> {
    let id = state.users.get_id_by_email(&email).await?;
    Ok(ApiResponse::new(StatusCode::OK, "User retrieved.", UserId { id }))
}

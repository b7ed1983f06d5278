//! Registration token routes

use std::sync::Arc;

use actimon_core::models::{Claims, IssueTokenRequest, IssuedToken};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Issue a registration token and email the invitation.
///
/// Every failure, including a failed delivery of an already stored token, is a 409.
#[utoipa::path(
    post,
    path = "/tokens",
    tag = "tokens",
    request_body = IssueTokenRequest,
    responses(
        (status = 201, description = "Token created and invitation sent", body = IssuedToken),
        (status = 409, description = "Token could not be issued or delivered", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, payload))]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    payload: Result<ValidatedJson<IssueTokenRequest>, HttpAppError>,
) -> Result<ApiResponse<IssuedToken>, HttpAppError> {
    let conflict = |e: HttpAppError| e.with_status(StatusCode::CONFLICT);

    let ValidatedJson(request) = payload.map_err(conflict)?;
    let token = state
        .tokens
        .issue(&request.email, &request.role)
        .await
        .map_err(|e| conflict(e.into()))?;

    Ok(ApiResponse::new(
        StatusCode::CREATED,
        "Token successfully created and Registration Email successfully Sent!",
        IssuedToken { token },
    ))
}

/// Check a registration token without consuming it.
#[utoipa::path(
    get,
    path = "/tokens/{token}",
    tag = "tokens",
    params(("token" = String, Path, description = "Registration token")),
    responses(
        (status = 200, description = "Token is valid", body = Claims),
        (status = 400, description = "Token already used or expired", body = ErrorResponse),
        (status = 404, description = "Token does not exist", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn validate_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<ApiResponse<Claims>, HttpAppError> {
    let claims = state.tokens.validate(&token).await?;
    Ok(ApiResponse::new(StatusCode::OK, "Token is valid.", claims))
}

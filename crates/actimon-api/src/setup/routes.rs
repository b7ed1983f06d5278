//! Route configuration and setup

use std::sync::Arc;
use std::time::Duration;

use actimon_core::{AppError, Config};
use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    BoxError, Json, Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::error::HttpAppError;
use crate::handlers::{health, measurements, tokens, users};
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use crate::telemetry::make_request_span;

const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let request_timeout = Duration::from_secs(config.base.request_timeout_secs.max(1));
    tracing::info!(
        http_concurrency_limit = HTTP_CONCURRENCY_LIMIT,
        request_timeout_secs = request_timeout.as_secs(),
        max_upload_size_bytes = config.base.max_upload_size_bytes,
        "HTTP limits configured"
    );

    let app = api_routes()
        .route("/health", get(health::health_check))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(config.base.max_upload_size_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tokens", post(tokens::issue_token))
        .route("/tokens/{token}", get(tokens::validate_token))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/by-token/{token}", post(users::register_with_token))
        .route(
            "/users/{email}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/id/{id}", get(users::get_user_email_by_id))
        .route("/users/{email}/id", get(users::get_user_id_by_email))
        .route(
            "/measurements",
            post(measurements::upload_measurements).layer(DefaultBodyLimit::disable()),
        )
}

async fn handle_timeout_error(err: BoxError) -> HttpAppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        HttpAppError::from(AppError::Internal("Request timed out".to_string()))
            .with_status(StatusCode::REQUEST_TIMEOUT)
            .with_message("Request timed out")
    } else {
        HttpAppError::from(AppError::Internal(format!("Unhandled internal error: {}", err)))
    }
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.base.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .base
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

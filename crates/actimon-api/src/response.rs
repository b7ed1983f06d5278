//! Success envelope shared by every JSON route

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `{ "message", "status", "data" }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub status: u16,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            status: status.as_u16(),
            data,
        }
    }
}

impl ApiResponse<serde_json::Map<String, serde_json::Value>> {
    /// Envelope with an empty `data` object
    pub fn empty(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, message, serde_json::Map::new())
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

//! Measurement upload route

use std::io;
use std::sync::Arc;

use actimon_core::AppError;
use actimon_services::payload_channel;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::{ErrorResponse, HttpAppError};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Chunks buffered between the multipart reader and the storage write
const PAYLOAD_CHANNEL_CAPACITY: usize = 8;

/// Outcome headers; a 204 carries no body on the wire.
pub const STORAGE_STATUS_HEADER: &str = "x-storage-status";
pub const STORAGE_ELAPSED_HEADER: &str = "x-storage-elapsed-ms";
pub const PUBLISH_STATUS_HEADER: &str = "x-publish-status";

fn bad_request(err: impl Into<HttpAppError>) -> HttpAppError {
    err.into().with_status(StatusCode::BAD_REQUEST)
}

/// Forward a gzip-compressed line-protocol file to the measurement store.
///
/// The file part is streamed through without being buffered in full.
#[utoipa::path(
    post,
    path = "/measurements",
    tag = "measurements",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 204, description = "Measurements forwarded; outcome in the X-Storage-Status, X-Storage-Elapsed-Ms and X-Publish-Status headers"),
        (status = 400, description = "Missing file or storage write failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn upload_measurements(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, HttpAppError> {
    // Other parts are ignored
    let mut field = loop {
        let next = multipart
            .next_field()
            .await
            .map_err(|e| bad_request(AppError::InvalidInput(format!("Invalid multipart body: {}", e))))?;
        match next {
            Some(field) if field.name() == Some("file") => break field,
            Some(_) => continue,
            None => {
                return Err(bad_request(AppError::InvalidInput(
                    "Missing 'file' field in multipart body".to_string(),
                )))
            }
        }
    };
    let filename = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| bad_request(AppError::InvalidInput("File part has no filename".into())))?;

    tracing::debug!(filename = %filename, "Receiving measurement upload");

    let (tx, payload) = payload_channel(PAYLOAD_CHANNEL_CAPACITY);
    let pump = async move {
        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if !tx.send(chunk).await {
                        // storage side gave up
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tx.fail(io::Error::other(e.to_string())).await;
                    break;
                }
            }
        }
    };

    let (_, result) = tokio::join!(pump, state.ingestion.ingest(&filename, payload));
    let outcome = result.map_err(bad_request)?;

    let headers = [
        (STORAGE_STATUS_HEADER, outcome.storage.status_code.to_string()),
        (
            STORAGE_ELAPSED_HEADER,
            outcome.storage.elapsed.as_millis().to_string(),
        ),
        (PUBLISH_STATUS_HEADER, outcome.publish.as_str().to_string()),
    ];

    Ok((
        headers,
        ApiResponse::empty(StatusCode::NO_CONTENT, outcome.to_string()),
    )
        .into_response())
}

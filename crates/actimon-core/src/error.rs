//! Error types module
//!
//! All fallible operations in Actimon return `AppError`. Each variant is one of the
//! exhaustive failure kinds of the token lifecycle, the user store or the ingestion
//! gateway, plus the usual database and internal failures.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for collaborator failures the caller can reconcile
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// Default HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "TOKEN_ALREADY_USED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Token has already been used")]
    AlreadyUsed,

    #[error("Token has expired")]
    Expired,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The invitation could not be delivered. The token was persisted and stays valid.
    #[error("Failed to deliver invitation: {reason}")]
    Delivery { token: String, reason: String },

    #[error("Ingestion failed: {message}")]
    IngestionFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidSignature => (
            404,
            "TOKEN_INVALID_SIGNATURE",
            false,
            Some("Request a new invitation"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::AlreadyUsed => (
            400,
            "TOKEN_ALREADY_USED",
            false,
            Some("Request a new invitation"),
            false,
            LogLevel::Debug,
        ),
        AppError::Expired => (
            400,
            "TOKEN_EXPIRED",
            false,
            Some("Request a new invitation"),
            false,
            LogLevel::Debug,
        ),
        AppError::AlreadyExists(_) => (
            409,
            "ALREADY_EXISTS",
            false,
            None,
            false,
            LogLevel::Warn,
        ),
        AppError::Delivery { .. } => (
            409,
            "DELIVERY_FAILED",
            true,
            Some("The token was stored; resend the invitation"),
            false,
            LogLevel::Warn,
        ),
        AppError::IngestionFailed { .. } => (
            400,
            "INGESTION_FAILED",
            true,
            Some("Retry the upload"),
            false,
            LogLevel::Warn,
        ),
        AppError::Conflict(_) => (409, "CONFLICT", false, None, false, LogLevel::Debug),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidSignature => "InvalidSignature",
            AppError::NotFound(_) => "NotFound",
            AppError::AlreadyUsed => "AlreadyUsed",
            AppError::Expired => "Expired",
            AppError::AlreadyExists(_) => "AlreadyExists",
            AppError::Delivery { .. } => "DeliveryError",
            AppError::IngestionFailed { .. } => "IngestionFailed",
            AppError::Conflict(_) => "Conflict",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// True for the kinds that mean "this token is not known to us".
    pub fn is_unknown_token(&self) -> bool {
        matches!(self, AppError::NotFound(_) | AppError::InvalidSignature)
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidSignature => "This token does not exist.".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::AlreadyUsed => "Token has already been used.".to_string(),
            AppError::Expired => "The registration token has expired.".to_string(),
            AppError::AlreadyExists(ref msg) => msg.clone(),
            AppError::Delivery { reason, .. } => {
                format!("Token created but the invitation could not be sent: {}", reason)
            }
            AppError::IngestionFailed { message, source } => format!("{}: {}", message, source),
            AppError::Conflict(ref msg) => msg.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

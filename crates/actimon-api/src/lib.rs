//! Actimon API Library
//!
//! HTTP surface for registration tokens, users and measurement uploads, plus the
//! application setup used by the binary and the integration tests.

mod api_doc;
mod handlers;
mod middleware;
mod telemetry;

pub mod error;
pub mod response;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use response::ApiResponse;
pub use state::AppState;

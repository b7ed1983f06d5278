//! Data models for the application
//!
//! Each sub-module covers one feature area: registration tokens, users and measurement
//! ingestion. Request DTOs live next to the entities they create.

mod ingestion;
mod token;
mod user;

pub use ingestion::*;
pub use token::*;
pub use user::*;

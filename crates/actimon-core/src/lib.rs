//! Actimon Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the token lifecycle, the ingestion gateway and the HTTP surface.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{
    BaseConfig, Config, EmailConfig, InfluxDbConfig, QueueConfig, StoreBackend, TokenConfig,
    TOKEN_TTL_DAYS,
};
pub use error::{AppError, ErrorMetadata, LogLevel};

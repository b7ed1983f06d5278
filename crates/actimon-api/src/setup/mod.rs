//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use std::sync::Arc;

use actimon_core::{Config, StoreBackend};
use anyhow::Result;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(&config)?;
    tracing::info!("Configuration loaded and validated successfully");

    let pool = match config.base.store_backend {
        StoreBackend::Postgres => Some(database::setup_database(&config).await?),
        StoreBackend::Memory => None,
    };

    let state = services::initialize_services(&config, pool).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

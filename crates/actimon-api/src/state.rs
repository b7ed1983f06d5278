//! Application state shared by all handlers

use std::sync::Arc;

use actimon_core::Config;
use actimon_services::{IngestionGateway, RegistrationService, TokenLifecycleService, UserService};
use sqlx::PgPool;

pub struct AppState {
    pub config: Config,
    pub tokens: Arc<TokenLifecycleService>,
    pub registration: RegistrationService,
    pub users: Arc<UserService>,
    pub ingestion: IngestionGateway,
    /// Present only with the PostgreSQL store backend
    pub db_pool: Option<PgPool>,
}

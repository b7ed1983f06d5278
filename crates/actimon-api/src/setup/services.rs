//! Service initialization and application state setup

use std::sync::Arc;

use actimon_core::{Config, StoreBackend};
use actimon_db::{
    MemoryTokenStore, MemoryUserStore, PostgresTokenStore, PostgresUserStore, TokenStore,
    UserStore,
};
use actimon_services::{
    create_notification_sender, InfluxDbBackend, IngestionGateway, InvitationTemplate,
    NotificationSender, QueuePublisher, RegistrationService, SqsQueuePublisher, StorageBackend,
    TokenCodec, TokenLifecycleService, UserService,
};
use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::state::AppState;

/// Collaborators that differ between deployments and tests
pub struct Collaborators {
    pub token_store: Arc<dyn TokenStore>,
    pub user_store: Arc<dyn UserStore>,
    pub notifier: Arc<dyn NotificationSender>,
    pub storage: Arc<dyn StorageBackend>,
    pub publisher: Option<Arc<dyn QueuePublisher>>,
}

/// Initialize all services and repositories, returning the application state
pub async fn initialize_services(config: &Config, pool: Option<PgPool>) -> Result<Arc<AppState>> {
    let (token_store, user_store): (Arc<dyn TokenStore>, Arc<dyn UserStore>) =
        match (config.base.store_backend, &pool) {
            (StoreBackend::Postgres, Some(pool)) => (
                Arc::new(PostgresTokenStore::new(pool.clone())),
                Arc::new(PostgresUserStore::new(pool.clone())),
            ),
            (StoreBackend::Postgres, None) => {
                anyhow::bail!("Postgres store backend selected but no database pool is available")
            }
            (StoreBackend::Memory, _) => {
                tracing::warn!("Using in-memory token and user stores, data is lost on restart");
                (
                    Arc::new(MemoryTokenStore::new()),
                    Arc::new(MemoryUserStore::new()),
                )
            }
        };

    let notifier =
        create_notification_sender(&config.email).context("Failed to create email sender")?;

    let storage = InfluxDbBackend::from_config(&config.influxdb)
        .context("Failed to create InfluxDB client")?;
    tracing::info!(
        url = %config.influxdb.url,
        org = %config.influxdb.org,
        bucket = %config.influxdb.bucket,
        precision = %config.influxdb.precision,
        "Measurement storage backend configured"
    );

    let publisher = SqsQueuePublisher::from_config(&config.queue)
        .await
        .context("Failed to create SQS publisher")?
        .map(|p| Arc::new(p) as Arc<dyn QueuePublisher>);

    let collaborators = Collaborators {
        token_store,
        user_store,
        notifier,
        storage: Arc::new(storage),
        publisher,
    };

    Ok(build_state(config, collaborators, pool))
}

/// Wire services over the given collaborators.
pub fn build_state(
    config: &Config,
    collaborators: Collaborators,
    db_pool: Option<PgPool>,
) -> Arc<AppState> {
    let tokens = Arc::new(TokenLifecycleService::new(
        TokenCodec::new(&config.tokens.registration_secret),
        collaborators.token_store,
        collaborators.notifier,
        InvitationTemplate::new(config.tokens.registration_url_base.clone()),
    ));
    let users = Arc::new(UserService::new(collaborators.user_store));
    let registration = RegistrationService::new(tokens.clone(), users.clone());

    let ingestion = IngestionGateway::new(
        collaborators.storage,
        collaborators.publisher,
        config.influxdb.write_timeout(),
        config.queue.publish_timeout(),
    );

    Arc::new(AppState {
        config: config.clone(),
        tokens,
        registration,
        users,
        ingestion,
        db_pool,
    })
}

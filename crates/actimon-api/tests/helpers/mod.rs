//! Test helpers: build AppState and router over in-memory collaborators.
//!
//! Run from workspace root: `cargo test -p actimon-api`. No Docker or network access is
//! needed; the storage backend is either a draining stub or a mockito server.

pub mod fixtures;
pub mod stubs;

use std::collections::HashMap;
use std::sync::Arc;

use actimon_api::setup::routes;
use actimon_api::setup::services::{build_state, Collaborators};
use actimon_core::Config;
use actimon_db::{MemoryTokenStore, MemoryUserStore};
use actimon_services::{QueuePublisher, StorageBackend};
use axum_test::TestServer;
use serde_json::Value;

pub use stubs::{DrainingStorage, RecordingNotifier, RecordingPublisher};

pub const TEST_SECRET: &str = "test-secret-key-min-32-characters-long";
pub const REGISTRATION_URL_BASE: &str = "http://localhost:3000/auth/register";

/// Memory-backed config pointing the storage backend at `influx_url`.
pub fn test_config(influx_url: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("STORE_BACKEND", "memory".to_string()),
        ("REGISTRATION_SECRET", TEST_SECRET.to_string()),
        ("REGISTRATION_URL_BASE", REGISTRATION_URL_BASE.to_string()),
        ("INFLUXDB_URL", influx_url.to_string()),
        ("INFLUXDB_ADMIN_TOKEN", "admin-token".to_string()),
        ("INFLUXDB_ORG", "acme".to_string()),
        ("INFLUXDB_BUCKET", "measurements".to_string()),
        ("INFLUXDB_WRITE_TIMEOUT_SECS", "5".to_string()),
        ("QUEUE_PUBLISH_TIMEOUT_SECS", "1".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config should be valid")
}

/// Test application: server plus handles on the recording collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub notifier: Arc<RecordingNotifier>,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup test app with memory stores and a storage stub that accepts everything.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config("http://influxdb.invalid"), Arc::new(DrainingStorage)).await
}

/// Setup test app with a specific config and storage backend.
pub async fn setup_test_app_with(config: Config, storage: Arc<dyn StorageBackend>) -> TestApp {
    build_test_app(config, storage, Arc::new(MemoryTokenStore::new()))
}

/// Setup test app over a token store the caller has already seeded.
pub async fn setup_test_app_with_tokens(token_store: Arc<MemoryTokenStore>) -> TestApp {
    build_test_app(
        test_config("http://influxdb.invalid"),
        Arc::new(DrainingStorage),
        token_store,
    )
}

fn build_test_app(
    config: Config,
    storage: Arc<dyn StorageBackend>,
    token_store: Arc<MemoryTokenStore>,
) -> TestApp {
    let notifier = Arc::new(RecordingNotifier::default());
    let publisher = Arc::new(RecordingPublisher::default());

    let collaborators = Collaborators {
        token_store,
        user_store: Arc::new(MemoryUserStore::new()),
        notifier: notifier.clone(),
        storage,
        publisher: Some(publisher.clone() as Arc<dyn QueuePublisher>),
    };

    let state = build_state(&config, collaborators, None);
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        notifier,
        publisher,
    }
}

/// Issue a token through the API and return it.
pub async fn issue_token(client: &TestServer, email: &str, role: &str) -> String {
    let response = client
        .post("/tokens")
        .json(&serde_json::json!({ "email": email, "role": role }))
        .await;
    assert_eq!(response.status_code(), 201, "issue failed: {}", response.text());

    let body: Value = response.json();
    body["data"]["token"]
        .as_str()
        .expect("Expected data.token in issue response")
        .to_string()
}

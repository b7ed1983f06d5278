//! Request logging tests.
//!
//! Run with: `cargo test -p actimon-api --test request_logging_test`
//! Kept in its own binary: it installs a thread-local subscriber.

mod helpers;

use std::io;
use std::sync::{Arc, Mutex};

use helpers::fixtures::registration_body;
use helpers::{issue_token, setup_test_app};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn test_token_routes_log_template_not_token() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("actimon=debug,tower_http=debug"))
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = setup_test_app().await;
    let client = app.client();
    let token = issue_token(client, "heidi@example.com", "viewer").await;

    let response = client.get(&format!("/tokens/{}", token)).await;
    assert_eq!(response.status_code(), 200);
    let response = client
        .post(&format!("/users/by-token/{}", token))
        .json(&registration_body())
        .await;
    assert_eq!(response.status_code(), 201);

    let output = logs.contents();
    assert!(output.contains("/tokens/{token}"), "route not logged:\n{output}");
    assert!(output.contains("/users/by-token/{token}"), "route not logged:\n{output}");
    assert!(!output.contains(&token), "token leaked into logs:\n{output}");
}

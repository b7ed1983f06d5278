//! Recording and stub collaborators.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use actimon_core::models::{ContentEncoding, IngestionEvent};
use actimon_services::{NotificationSender, PayloadStream, QueuePublisher, StorageBackend, StorageReceipt};
use futures::StreamExt;

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Keeps every invitation instead of sending it. `set_failing(true)` makes sends fail.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("SMTP relay unavailable");
        }
        self.sent.lock().unwrap().push(SentMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<IngestionEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<IngestionEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl QueuePublisher for RecordingPublisher {
    async fn publish(&self, event: &IngestionEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Storage stand-in that reads the whole payload and answers 204.
pub struct DrainingStorage;

#[async_trait::async_trait]
impl StorageBackend for DrainingStorage {
    async fn write(
        &self,
        payload: PayloadStream,
        _encoding: ContentEncoding,
    ) -> anyhow::Result<StorageReceipt> {
        let _ = payload.count().await;
        Ok(StorageReceipt { status_code: 204 })
    }
}

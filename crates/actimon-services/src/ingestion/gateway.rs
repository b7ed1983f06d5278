use std::sync::Arc;
use std::time::{Duration, Instant};

use actimon_core::{
    models::{ContentEncoding, IngestionEvent, IngestionOutcome, PublishStatus, StorageStatus},
    AppError,
};

use super::{PayloadStream, QueuePublisher, StorageBackend};

/// Fans one upload out to the queue and the storage backend.
///
/// The event is announced before the storage write starts. Only the storage write decides
/// success; a publish failure is reported in the outcome. No retries.
#[derive(Clone)]
pub struct IngestionGateway {
    storage: Arc<dyn StorageBackend>,
    publisher: Option<Arc<dyn QueuePublisher>>,
    storage_timeout: Duration,
    publish_timeout: Duration,
    encoding: ContentEncoding,
}

impl IngestionGateway {
    pub fn new(
        storage: Arc<dyn StorageBackend>,
        publisher: Option<Arc<dyn QueuePublisher>>,
        storage_timeout: Duration,
        publish_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            publisher,
            storage_timeout,
            publish_timeout,
            encoding: ContentEncoding::Gzip,
        }
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn ingest(
        &self,
        filename: &str,
        payload: PayloadStream,
    ) -> Result<IngestionOutcome, AppError> {
        let publish = self.announce(filename).await;

        let started = Instant::now();
        let write = self.storage.write(payload, self.encoding);
        let receipt = match tokio::time::timeout(self.storage_timeout, write).await {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, publish = publish.as_str(), "Storage write failed");
                return Err(AppError::IngestionFailed {
                    message: "Storage write failed".to_string(),
                    source: e,
                });
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.storage_timeout.as_secs_f64(),
                    "Storage write timed out"
                );
                return Err(AppError::IngestionFailed {
                    message: "Storage write timed out".to_string(),
                    source: anyhow::anyhow!(
                        "no response within {:.3}s",
                        self.storage_timeout.as_secs_f64()
                    ),
                });
            }
        };
        let elapsed = started.elapsed();

        tracing::info!(
            status = receipt.status_code,
            elapsed_ms = elapsed.as_millis() as u64,
            publish = publish.as_str(),
            "Measurements forwarded"
        );

        Ok(IngestionOutcome {
            filename: filename.to_string(),
            storage: StorageStatus {
                status_code: receipt.status_code,
                elapsed,
            },
            publish,
        })
    }

    async fn announce(&self, filename: &str) -> PublishStatus {
        let Some(publisher) = &self.publisher else {
            return PublishStatus::Disabled;
        };

        let event = IngestionEvent::for_file(filename);
        match tokio::time::timeout(self.publish_timeout, publisher.publish(&event)).await {
            Ok(Ok(())) => PublishStatus::Published,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Ingestion event publish failed");
                PublishStatus::Failed {
                    reason: format!("{:#}", e),
                }
            }
            Err(_) => {
                tracing::warn!("Ingestion event publish timed out");
                PublishStatus::Failed {
                    reason: format!(
                        "publish timed out after {:.3}s",
                        self.publish_timeout.as_secs_f64()
                    ),
                }
            }
        }
    }
}

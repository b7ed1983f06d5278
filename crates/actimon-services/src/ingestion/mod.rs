//! Measurement ingestion
//!
//! The gateway takes one compressed upload, announces it on the queue, streams it to the
//! time-series store and reports both results together.

mod gateway;
mod influxdb;
mod payload;
mod sqs;

pub use gateway::IngestionGateway;
pub use influxdb::InfluxDbBackend;
pub use payload::{payload_channel, PayloadSender, PayloadStream};
pub use sqs::SqsQueuePublisher;

use actimon_core::models::{ContentEncoding, IngestionEvent};

/// Status returned by the storage write endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageReceipt {
    pub status_code: u16,
}

/// Write endpoint of the time-series store
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Forward the payload as-is, declaring its encoding. Non-success responses are errors.
    async fn write(
        &self,
        payload: PayloadStream,
        encoding: ContentEncoding,
    ) -> anyhow::Result<StorageReceipt>;
}

/// Broker client used to announce accepted uploads
#[async_trait::async_trait]
pub trait QueuePublisher: Send + Sync {
    async fn publish(&self, event: &IngestionEvent) -> anyhow::Result<()>;
}

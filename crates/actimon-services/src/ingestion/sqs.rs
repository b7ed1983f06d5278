use anyhow::Context;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::Client as SqsClient;

use actimon_core::{config::QueueConfig, models::IngestionEvent};

use super::QueuePublisher;

/// Publishes ingestion events to an SQS (or SQS-compatible) queue
#[derive(Clone)]
pub struct SqsQueuePublisher {
    client: SqsClient,
    queue_url: String,
}

impl SqsQueuePublisher {
    pub fn new(client: SqsClient, queue_url: String) -> Self {
        Self { client, queue_url }
    }

    /// Build a publisher from config, or `None` when no queue is configured.
    pub async fn from_config(config: &QueueConfig) -> anyhow::Result<Option<Self>> {
        let Some(queue_url) = config.sqs_queue_url.clone() else {
            tracing::info!("SQS_QUEUE_URL not set, ingestion events will not be published");
            return Ok(None);
        };

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.aws_region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.sqs_endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        tracing::info!(queue_url = %queue_url, "SQS publisher initialized");
        Ok(Some(Self::new(SqsClient::new(&sdk_config), queue_url)))
    }
}

#[async_trait::async_trait]
impl QueuePublisher for SqsQueuePublisher {
    async fn publish(&self, event: &IngestionEvent) -> anyhow::Result<()> {
        let body = serde_json::to_string(event).context("Failed to serialize ingestion event")?;

        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .context("Failed to publish ingestion event to SQS")?;

        Ok(())
    }
}

use std::time::Duration;

use anyhow::Context;
use reqwest::header::{AUTHORIZATION, CONTENT_ENCODING};
use reqwest::{Body, Client};

use actimon_core::{config::InfluxDbConfig, models::ContentEncoding};

use super::{PayloadStream, StorageBackend, StorageReceipt};

/// InfluxDB v2 line-protocol write endpoint
#[derive(Clone)]
pub struct InfluxDbBackend {
    http_client: Client,
    write_url: String,
    token: String,
    org: String,
    bucket: String,
    precision: String,
}

impl InfluxDbBackend {
    pub fn from_config(config: &InfluxDbConfig) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.write_timeout())
            .build()
            .context("Failed to create HTTP client for InfluxDB")?;

        Ok(Self {
            http_client,
            write_url: format!("{}/api/v2/write", config.url.trim_end_matches('/')),
            token: config.token.clone(),
            org: config.org.clone(),
            bucket: config.bucket.clone(),
            precision: config.precision.clone(),
        })
    }
}

#[async_trait::async_trait]
impl StorageBackend for InfluxDbBackend {
    #[tracing::instrument(skip(self, payload), fields(storage.bucket = %self.bucket))]
    async fn write(
        &self,
        payload: PayloadStream,
        encoding: ContentEncoding,
    ) -> anyhow::Result<StorageReceipt> {
        let response = self
            .http_client
            .post(&self.write_url)
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", self.precision.as_str()),
            ])
            .header(CONTENT_ENCODING, encoding.as_str())
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .body(Body::wrap_stream(payload))
            .send()
            .await
            .context("Failed to send payload to InfluxDB")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("InfluxDB write failed ({}): {}", status, error_text);
        }

        Ok(StorageReceipt {
            status_code: status.as_u16(),
        })
    }
}

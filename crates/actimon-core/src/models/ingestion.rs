use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Reference event announced on the queue for every accepted upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionEvent {
    /// Filename supplied by the uploader
    pub data: String,
}

impl IngestionEvent {
    pub fn for_file(filename: impl Into<String>) -> Self {
        Self {
            data: filename.into(),
        }
    }
}

/// Compression of a forwarded payload. The gateway never decodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
        }
    }
}

/// Result of the storage forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStatus {
    pub status_code: u16,
    pub elapsed: Duration,
}

/// Result of the queue announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    Published,
    Failed { reason: String },
    Disabled,
}

impl PublishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Published => "published",
            PublishStatus::Failed { .. } => "failed",
            PublishStatus::Disabled => "disabled",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PublishStatus::Failed { .. })
    }
}

/// Composite result of one upload. Storage success is what makes it an `Ok`.
#[derive(Debug, Clone)]
pub struct IngestionOutcome {
    pub filename: String,
    pub storage: StorageStatus,
    pub publish: PublishStatus,
}

impl fmt::Display for IngestionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Time elapsed: {}",
            self.storage.status_code,
            self.storage.elapsed.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_string(&IngestionEvent::for_file("batch-01.gz")).unwrap();
        assert_eq!(json, r#"{"data":"batch-01.gz"}"#);
    }

    #[test]
    fn test_outcome_message() {
        let outcome = IngestionOutcome {
            filename: "batch-01.gz".to_string(),
            storage: StorageStatus {
                status_code: 204,
                elapsed: Duration::from_millis(1500),
            },
            publish: PublishStatus::Failed {
                reason: "broker down".to_string(),
            },
        };
        assert_eq!(outcome.to_string(), "204 | Time elapsed: 1.5");
        assert!(outcome.publish.is_failed());
        assert_eq!(outcome.publish.as_str(), "failed");
    }
}

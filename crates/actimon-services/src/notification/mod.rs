//! Invitation delivery
//!
//! `NotificationSender` is the seam the token lifecycle hands rendered invitations to.
//! SMTP delivery is used when email is enabled; otherwise invitations are only logged.

mod log;
mod smtp;
mod template;

pub use log::LogNotificationSender;
pub use smtp::SmtpNotificationSender;
pub use template::{InvitationMessage, InvitationTemplate};

use std::sync::Arc;

use actimon_core::config::EmailConfig;

#[async_trait::async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver an HTML message to one address
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

/// Pick the sender for the configured email settings.
pub fn create_notification_sender(config: &EmailConfig) -> anyhow::Result<Arc<dyn NotificationSender>> {
    if !config.enabled {
        tracing::info!("Email disabled (EMAIL_ENABLED=false), invitations will be logged");
        return Ok(Arc::new(LogNotificationSender));
    }

    Ok(Arc::new(SmtpNotificationSender::from_config(config)?))
}

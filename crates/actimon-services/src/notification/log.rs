use super::NotificationSender;

/// Sender used when email is disabled. Records that an invitation was produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSender;

#[async_trait::async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        tracing::info!(
            to = %to,
            subject = %subject,
            body_len = html_body.len(),
            "Email delivery disabled, invitation not sent"
        );
        Ok(())
    }
}

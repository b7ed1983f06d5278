use anyhow::Context;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

use actimon_core::config::EmailConfig;

use super::NotificationSender;

/// SMTP delivery through lettre's async transport
#[derive(Clone)]
pub struct SmtpNotificationSender {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl SmtpNotificationSender {
    pub fn from_config(config: &EmailConfig) -> anyhow::Result<Self> {
        let host = config
            .smtp_host
            .as_deref()
            .context("SMTP_HOST must be set when email is enabled")?;
        let from: Mailbox = config
            .smtp_from
            .as_deref()
            .context("SMTP_FROM must be set when email is enabled")?
            .parse()
            .context("Invalid SMTP_FROM address")?;
        let port = config.smtp_port;
        let credentials = match (&config.smtp_user, &config.smtp_password) {
            (Some(u), Some(p)) => Some(Credentials::new(u.clone(), p.clone())),
            _ => None,
        };

        let mailer = if config.smtp_tls {
            let b = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .context("Failed to create STARTTLS SMTP transport")?
                .port(port);
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(host = %host, port = port, "Email service initialized (SMTP with STARTTLS)");
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(host = %host, port = port, "Email service initialized (SMTP)");
            b.build()
        };

        Ok(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }
}

#[async_trait::async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        let to_addr: Mailbox = to
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", to))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to_addr)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .context("Failed to build invitation email")?;

        self.mailer
            .send(email)
            .await
            .context("SMTP delivery failed")?;

        tracing::info!(to = %to, "Invitation email sent");
        Ok(())
    }
}

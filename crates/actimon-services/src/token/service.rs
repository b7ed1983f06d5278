use std::sync::Arc;

use actimon_core::{models::Claims, AppError, TOKEN_TTL_DAYS};
use actimon_db::TokenStore;
use chrono::{Duration, Utc};

use super::codec::TokenCodec;
use crate::notification::{InvitationTemplate, NotificationSender};

/// Drives a registration token from issuance to consumption.
///
/// Per token the only transition is unused -> used, performed by `consume` through the
/// store's atomic `mark_used`. Expiry is evaluated on every check rather than stored.
#[derive(Clone)]
pub struct TokenLifecycleService {
    codec: TokenCodec,
    store: Arc<dyn TokenStore>,
    notifier: Arc<dyn NotificationSender>,
    template: InvitationTemplate,
    ttl: Duration,
}

impl TokenLifecycleService {
    pub fn new(
        codec: TokenCodec,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn NotificationSender>,
        template: InvitationTemplate,
    ) -> Self {
        Self {
            codec,
            store,
            notifier,
            template,
            ttl: Duration::days(TOKEN_TTL_DAYS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Mint, persist and send an invitation token.
    ///
    /// A delivery failure does not roll back the insert: the caller gets
    /// `AppError::Delivery` carrying the still-valid token.
    #[tracing::instrument(skip(self))]
    pub async fn issue(&self, email: &str, role: &str) -> Result<String, AppError> {
        let token = self.codec.encode(email, role, self.ttl)?;
        self.store.insert(&token).await?;
        tracing::info!(email = %email, "Registration token stored");

        let message = self.template.render(&token);
        if let Err(e) = self
            .notifier
            .send(email, &message.subject, &message.html_body)
            .await
        {
            tracing::warn!(
                email = %email,
                error = %e,
                "Invitation delivery failed, token kept for resend"
            );
            return Err(AppError::Delivery {
                token,
                reason: format!("{:#}", e),
            });
        }

        Ok(token)
    }

    /// Check a token without changing it.
    ///
    /// Order: store lookup (`NotFound`, `AlreadyUsed`), then signature
    /// (`InvalidSignature`), then expiry (`Expired`).
    #[tracing::instrument(skip_all)]
    pub async fn validate(&self, token: &str) -> Result<Claims, AppError> {
        if self.store.is_used(token).await? {
            return Err(AppError::AlreadyUsed);
        }

        let claims = self.codec.decode(token)?;
        if claims.is_expired_at(Utc::now()) {
            return Err(AppError::Expired);
        }

        Ok(claims)
    }

    /// Validate, then mark used. Only one concurrent caller per token succeeds.
    #[tracing::instrument(skip_all)]
    pub async fn consume(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.validate(token).await?;

        if !self.store.mark_used(token).await? {
            tracing::debug!("Token consumed concurrently by another request");
            return Err(AppError::AlreadyUsed);
        }

        tracing::info!(email = %claims.email, "Registration token consumed");
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actimon_db::MemoryTokenStore;
    use std::sync::Mutex;

    const SECRET: &str = "test-secret-key-min-32-characters-long";

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(&self, to: &str, _subject: &str, html_body: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("connection refused");
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), html_body.to_string()));
            Ok(())
        }
    }

    fn service(sender: Arc<RecordingSender>) -> (TokenLifecycleService, MemoryTokenStore) {
        let store = MemoryTokenStore::new();
        let service = TokenLifecycleService::new(
            TokenCodec::new(SECRET),
            Arc::new(store.clone()),
            sender,
            InvitationTemplate::new("http://localhost:3000/auth/register"),
        );
        (service, store)
    }

    #[tokio::test]
    async fn test_issue_then_validate() {
        let sender = Arc::new(RecordingSender::default());
        let (service, _) = service(sender.clone());

        let token = service.issue("alice@example.com", "viewer").await.unwrap();
        let claims = service.validate(&token).await.unwrap();
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, "viewer");

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "alice@example.com");
        assert!(sent[0].1.contains(&token));
    }

    #[tokio::test]
    async fn test_validate_does_not_consume() {
        let (service, _) = service(Arc::new(RecordingSender::default()));
        let token = service.issue("alice@example.com", "viewer").await.unwrap();

        service.validate(&token).await.unwrap();
        service.validate(&token).await.unwrap();
        service.consume(&token).await.unwrap();
        assert!(matches!(
            service.validate(&token).await,
            Err(AppError::AlreadyUsed)
        ));
    }

    #[tokio::test]
    async fn test_consume_twice_fails() {
        let (service, _) = service(Arc::new(RecordingSender::default()));
        let token = service.issue("alice@example.com", "viewer").await.unwrap();

        service.consume(&token).await.unwrap();
        assert!(matches!(
            service.consume(&token).await,
            Err(AppError::AlreadyUsed)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_consume_single_winner() {
        let (service, _) = service(Arc::new(RecordingSender::default()));
        let token = service.issue("alice@example.com", "viewer").await.unwrap();

        let attempts = (0..16).map(|_| {
            let service = service.clone();
            let token = token.clone();
            tokio::spawn(async move { service.consume(&token).await })
        });
        let results = futures::future::join_all(attempts).await;

        let mut ok = 0;
        for result in results {
            match result.unwrap() {
                Ok(_) => ok += 1,
                Err(AppError::AlreadyUsed) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let (service, _) = service(Arc::new(RecordingSender::default()));
        let service = service.with_ttl(Duration::seconds(-60));
        let token = service.issue("alice@example.com", "viewer").await.unwrap();

        assert!(matches!(
            service.validate(&token).await,
            Err(AppError::Expired)
        ));
        assert!(matches!(
            service.consume(&token).await,
            Err(AppError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_unknown_token_not_found() {
        let (service, _) = service(Arc::new(RecordingSender::default()));
        let stray = TokenCodec::new(SECRET)
            .encode("bob@example.com", "admin", Duration::days(7))
            .unwrap();

        assert!(matches!(
            service.validate(&stray).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_forged_token_in_store_rejected() {
        let (service, store) = service(Arc::new(RecordingSender::default()));
        let forged = TokenCodec::new("another-secret-key-that-is-32-chars-long")
            .encode("mallory@example.com", "admin", Duration::days(7))
            .unwrap();
        store.insert(&forged).await.unwrap();

        let err = service.validate(&forged).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidSignature));
        assert!(err.is_unknown_token());
    }

    #[tokio::test]
    async fn test_delivery_failure_keeps_token() {
        let sender = Arc::new(RecordingSender {
            fail: true,
            ..Default::default()
        });
        let (service, store) = service(sender);

        let err = service
            .issue("alice@example.com", "viewer")
            .await
            .unwrap_err();
        let token = match err {
            AppError::Delivery { token, reason } => {
                assert!(reason.contains("connection refused"));
                token
            }
            other => panic!("expected delivery error, got {other}"),
        };

        assert!(store.exists(&token).await.unwrap());
        assert_eq!(
            service.validate(&token).await.unwrap().email,
            "alice@example.com"
        );
    }
}

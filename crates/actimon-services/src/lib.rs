//! Actimon Services Layer
//!
//! Business services for the two subsystems: the registration token lifecycle (codec,
//! lifecycle orchestration, registration completion, users, invitation delivery) and the
//! measurement ingestion gateway (storage forward plus queue announcement). HTTP handling
//! stays in actimon-api.

pub mod ingestion;
pub mod notification;
pub mod registration;
pub mod token;
pub mod users;

pub use ingestion::{
    payload_channel, InfluxDbBackend, IngestionGateway, PayloadSender, PayloadStream,
    QueuePublisher, SqsQueuePublisher, StorageBackend, StorageReceipt,
};
pub use notification::{
    create_notification_sender, InvitationMessage, InvitationTemplate, LogNotificationSender,
    NotificationSender, SmtpNotificationSender,
};
pub use registration::RegistrationService;
pub use token::{TokenCodec, TokenLifecycleService};
pub use users::UserService;

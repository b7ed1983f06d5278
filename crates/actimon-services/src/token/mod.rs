//! Registration token lifecycle
//!
//! `TokenCodec` signs and verifies claim sets; `TokenLifecycleService` drives a token
//! through issue, validate and consume on top of a `TokenStore`.

pub mod codec;
pub mod service;

pub use codec::TokenCodec;
pub use service::TokenLifecycleService;

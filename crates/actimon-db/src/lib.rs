//! Actimon persistence layer
//!
//! Registration tokens and users are reached through the `TokenStore` and `UserStore`
//! traits. Each has a PostgreSQL implementation and an in-memory one used for local runs
//! and tests.

pub mod db;

pub use db::{
    MemoryTokenStore, MemoryUserStore, PostgresTokenStore, PostgresUserStore, TokenStore,
    UserStore,
};

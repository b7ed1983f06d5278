//! Store traits and their implementations
//
// Registration token store (used flag keyed by token string)
pub mod token;
//
// User records
pub mod user;
//
// In-memory implementations of both stores
pub mod memory;

pub use memory::{MemoryTokenStore, MemoryUserStore};
pub use token::{PostgresTokenStore, TokenStore};
pub use user::{PostgresUserStore, UserStore};

pub mod health;
pub mod measurements;
pub mod tokens;
pub mod users;

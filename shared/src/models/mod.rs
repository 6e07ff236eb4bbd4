//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod employee;
pub mod role;
pub mod user;

// Re-exports
pub use employee::*;
pub use role::*;
pub use user::*;

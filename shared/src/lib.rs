//! Shared types for the employee directory
//!
//! Domain models, the structured error type and small utilities used by
//! the directory crate and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};

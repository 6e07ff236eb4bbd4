//! Unified error system for the employee directory
//!
//! - [`ErrorCode`]: numeric code per failure
//! - [`ErrorCategory`]: validation / permission / not found / store ...
//! - [`AppError`]: code + message + optional structured details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::EmployeeNotFound);
//! assert_eq!(err.message, "Employee not found");
//!
//! let err = AppError::validation("Name must not be empty")
//!     .with_detail("field", "name");
//! assert!(err.details.is_some());
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{AppError, AppResult};

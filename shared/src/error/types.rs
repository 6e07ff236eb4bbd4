//! Error type

use super::codes::ErrorCode;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by every directory operation
///
/// `message` is what the operator sees (unless the code is a store
/// failure, see [`AppError::user_message`]); `details` carries the offending
/// field, line or path for logs and tests.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Whether this is a permission error
    pub fn is_permission_denied(&self) -> bool {
        self.code == ErrorCode::PermissionDenied
    }

    /// Message suitable for the operator.
    ///
    /// System errors collapse into a generic failure; the detail stays in
    /// the logs.
    pub fn user_message(&self) -> String {
        if self.code.is_system() {
            "Operation failed. See the log for details.".to_string()
        } else {
            self.message.clone()
        }
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        let p = path.into();
        Self::with_message(ErrorCode::FileNotFound, format!("File not found: {}", p))
            .with_detail("path", p)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create a file system error
    pub fn io(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::IoError, msg)
    }

    /// Create a delimited-text error
    pub fn csv(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::CsvError, msg)
    }

    /// Create an invalid format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidFormat, msg)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::io(err.to_string())
    }
}

/// Result type using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::PermissionDenied);
        assert_eq!(err.message, "Permission denied");
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_file_not_found_carries_path_detail() {
        let err = AppError::file_not_found("staff.csv");
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert_eq!(err.message, "File not found: staff.csv");
        let details = err.details.unwrap();
        assert_eq!(details["path"], "staff.csv");
    }

    #[test]
    fn test_user_message_hides_store_detail() {
        let err = AppError::database("no such table: employees");
        assert_eq!(err.user_message(), "Operation failed. See the log for details.");

        let err = AppError::validation("Name must not be empty");
        assert_eq!(err.user_message(), "Name must not be empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = io.into();
        assert_eq!(err.code, ErrorCode::IoError);
    }
}

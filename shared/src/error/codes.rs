//! Error codes
//!
//! Ranges:
//! - 0xxx: input and lookup failures
//! - 1xxx: login
//! - 2xxx: refused operations
//! - 8xxx: directory records
//! - 9xxx: store / file system

use serde::Serialize;
use std::fmt;

/// Error code, serialized as its number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx ====================
    ValidationFailed = 1,
    AlreadyExists = 2,
    /// Operation cannot run in the current setup (e.g. backing up an
    /// in-memory database)
    InvalidRequest = 3,
    /// Malformed numeric identifier, unknown column or role name
    InvalidFormat = 4,
    /// Import source does not exist
    FileNotFound = 5,

    // ==================== 1xxx ====================
    InvalidCredentials = 1001,

    // ==================== 2xxx ====================
    PermissionDenied = 2001,
    UserCannotDeleteSelf = 2002,
    /// Seed accounts are permanent
    UserIsSystem = 2003,

    // ==================== 8xxx ====================
    EmployeeNotFound = 8001,
    UserNotFound = 8002,

    // ==================== 9xxx ====================
    InternalError = 9001,
    DatabaseError = 9002,
    IoError = 9004,
    CsvError = 9005,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Failure of the store or file system rather than of the caller's input
    pub const fn is_system(&self) -> bool {
        self.code() >= 9000
    }

    /// Default message, used when no specific one is given
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::AlreadyExists => "Already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::FileNotFound => "File not found",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::UserCannotDeleteSelf => "Cannot delete your own account",
            ErrorCode::UserIsSystem => "System accounts cannot be deleted",
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::IoError => "File system error",
            ErrorCode::CsvError => "CSV error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

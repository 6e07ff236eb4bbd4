//! Error taxonomy
//!
//! Groups codes the way the operator experiences them: bad input, a refused
//! operation, something missing, a clash with existing data, or a failure of
//! the store / file system underneath.

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Empty required field, malformed identifier or column name
    Validation,
    /// Login problems
    Auth,
    /// Role does not allow the operation
    Permission,
    /// Missing row or file
    NotFound,
    /// Duplicate username
    Conflict,
    /// Database, file system, CSV encoding
    Store,
}

impl ErrorCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Store => "store",
        }
    }
}

impl ErrorCode {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::ValidationFailed | ErrorCode::InvalidRequest | ErrorCode::InvalidFormat => {
                ErrorCategory::Validation
            }
            ErrorCode::InvalidCredentials => ErrorCategory::Auth,
            ErrorCode::PermissionDenied
            | ErrorCode::UserCannotDeleteSelf
            | ErrorCode::UserIsSystem => ErrorCategory::Permission,
            ErrorCode::FileNotFound
            | ErrorCode::EmployeeNotFound
            | ErrorCode::UserNotFound => ErrorCategory::NotFound,
            ErrorCode::AlreadyExists => ErrorCategory::Conflict,
            ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::IoError
            | ErrorCode::CsvError => ErrorCategory::Store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_and_row_share_category() {
        assert_eq!(ErrorCode::FileNotFound.category(), ErrorCategory::NotFound);
        assert_eq!(ErrorCode::EmployeeNotFound.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_system_codes_are_store_failures() {
        for code in [ErrorCode::DatabaseError, ErrorCode::IoError, ErrorCode::CsvError] {
            assert!(code.is_system());
            assert_eq!(code.category(), ErrorCategory::Store);
        }
        assert_eq!(ErrorCode::UserIsSystem.category().name(), "permission");
    }
}

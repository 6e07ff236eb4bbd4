//! Permission Definitions
//!
//! Role × operation decision table.
//!
//! ## 设计原则
//! - 查询员工：登录即可使用
//! - 更新员工：admin 任意记录，普通用户仅限本人关联的记录
//! - 其余写操作、导入导出、用户管理、备份：仅 admin

use std::fmt;

use shared::models::Role;

use super::CurrentUser;
use crate::utils::{AppError, AppResult};

/// Operations gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddEmployee,
    UpdateEmployee,
    DeleteEmployee,
    SearchEmployees,
    ViewEmployee,
    AssignOwner,
    ImportCsv,
    ExportCsv,
    ManageUsers,
    ListUsers,
    Backup,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::AddEmployee => "add employee",
            Operation::UpdateEmployee => "update employee",
            Operation::DeleteEmployee => "delete employee",
            Operation::SearchEmployees => "search employees",
            Operation::ViewEmployee => "view employee",
            Operation::AssignOwner => "assign employee owner",
            Operation::ImportCsv => "import CSV",
            Operation::ExportCsv => "export CSV",
            Operation::ManageUsers => "manage users",
            Operation::ListUsers => "list users",
            Operation::Backup => "backup database",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    /// Allowed only on rows owned by the acting user
    OwnRecordsOnly,
    Denied,
}

/// Pure decision table
pub fn authorize(role: Role, operation: Operation) -> Decision {
    match (role, operation) {
        (Role::Admin, _) => Decision::Allowed,
        (Role::User, Operation::UpdateEmployee) => Decision::OwnRecordsOnly,
        (
            Role::User,
            Operation::SearchEmployees | Operation::ViewEmployee | Operation::ListUsers,
        ) => Decision::Allowed,
        (
            Role::User,
            Operation::AddEmployee
            | Operation::DeleteEmployee
            | Operation::AssignOwner
            | Operation::ImportCsv
            | Operation::ExportCsv
            | Operation::ManageUsers
            | Operation::Backup,
        ) => Decision::Denied,
    }
}

/// Check the policy for `user`, failing with `PermissionDenied` when denied
pub fn require(user: &CurrentUser, operation: Operation) -> AppResult<Decision> {
    match authorize(user.role, operation) {
        Decision::Denied => Err(AppError::permission_denied(format!(
            "Permission denied: cannot {operation}"
        ))
        .with_detail("operation", operation.as_str())
        .with_detail("role", user.role.as_str())),
        decision => Ok(decision),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    const ADMIN_ONLY: [Operation; 7] = [
        Operation::AddEmployee,
        Operation::DeleteEmployee,
        Operation::AssignOwner,
        Operation::ImportCsv,
        Operation::ExportCsv,
        Operation::ManageUsers,
        Operation::Backup,
    ];

    #[test]
    fn test_admin_allowed_everything() {
        for op in ADMIN_ONLY {
            assert_eq!(authorize(Role::Admin, op), Decision::Allowed);
        }
        assert_eq!(
            authorize(Role::Admin, Operation::UpdateEmployee),
            Decision::Allowed
        );
    }

    #[test]
    fn test_user_denied_admin_operations() {
        for op in ADMIN_ONLY {
            assert_eq!(authorize(Role::User, op), Decision::Denied, "{op}");
        }
    }

    #[test]
    fn test_user_scoped_update_and_open_reads() {
        assert_eq!(
            authorize(Role::User, Operation::UpdateEmployee),
            Decision::OwnRecordsOnly
        );
        assert_eq!(
            authorize(Role::User, Operation::SearchEmployees),
            Decision::Allowed
        );
        assert_eq!(authorize(Role::User, Operation::ListUsers), Decision::Allowed);
    }

    #[test]
    fn test_require_maps_denied_to_permission_error() {
        let user = CurrentUser::new(2, "bo", Role::User);
        let err = require(&user, Operation::Backup).unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert!(err.is_permission_denied());

        let admin = CurrentUser::new(1, "admin", Role::Admin);
        assert_eq!(require(&admin, Operation::Backup).unwrap(), Decision::Allowed);
    }
}

//! 审计日志类型定义

use serde::{Deserialize, Serialize};

/// 审计操作类型（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ 认证 ═══
    /// 登录成功
    LoginSuccess,
    /// 登录失败
    LoginFailed,

    // ═══ 员工 ═══
    /// 员工创建
    EmployeeCreated,
    /// 员工更新
    EmployeeUpdated,
    /// 员工删除
    EmployeeDeleted,
    /// 员工关联账号变更
    EmployeeOwnerAssigned,
    /// CSV 导入
    EmployeesImported,
    /// CSV 导出
    EmployeesExported,

    // ═══ 用户 ═══
    /// 用户注册
    UserRegistered,
    /// 用户删除
    UserDeleted,

    // ═══ 系统 ═══
    /// 数据库备份
    BackupCreated,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::LoginSuccess => "login_success",
            AuditAction::LoginFailed => "login_failed",
            AuditAction::EmployeeCreated => "employee_created",
            AuditAction::EmployeeUpdated => "employee_updated",
            AuditAction::EmployeeDeleted => "employee_deleted",
            AuditAction::EmployeeOwnerAssigned => "employee_owner_assigned",
            AuditAction::EmployeesImported => "employees_imported",
            AuditAction::EmployeesExported => "employees_exported",
            AuditAction::UserRegistered => "user_registered",
            AuditAction::UserDeleted => "user_deleted",
            AuditAction::BackupCreated => "backup_created",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 审计级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditLevel {
    Info,
    Warning,
    Error,
}

impl AuditLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditLevel::Info => "INFO",
            AuditLevel::Warning => "WARNING",
            AuditLevel::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Services Module
//!
//! 业务服务层：每个操作显式接收 [`CurrentUser`](crate::auth::CurrentUser)，
//! 先过权限策略，再访问仓储，并写审计日志。
//!
//! - [`EmployeeService`] - 员工 CRUD、搜索、CSV 导入导出
//! - [`UserService`] - 用户注册 / 删除 / 按角色列出
//! - [`BackupService`] - 数据库文件备份

pub mod backup;
pub mod employee;
pub mod transfer;
pub mod user;

pub use backup::BackupService;
pub use employee::{EmployeeService, SearchRequest};
pub use transfer::{CSV_HEADER, ExportOutcome};
pub use user::UserService;

//! 审计日志模块
//!
//! # 架构
//!
//! ```text
//! 服务层操作
//!   └─ AuditLog::record() → append → employee_directory.log
//!                         └→ tracing (target = "audit")
//! ```
//!
//! 每行格式：`YYYY-MM-DD HH:MM:SS,mmm - LEVEL - [action] message`
//!
//! - **Append-only**: 只追加，不提供删除/修改接口
//! - 失败的操作同样记录（WARNING / ERROR）

pub mod log;
pub mod types;

pub use log::AuditLog;
pub use types::{AuditAction, AuditLevel};

//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`query_builder`] - 员工搜索查询构建
//! - 校验、日志等工具

pub mod logger;
pub mod query_builder;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

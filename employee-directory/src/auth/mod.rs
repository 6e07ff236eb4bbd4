//! 认证授权模块
//!
//! - [`authenticate`] - 用户名/密码校验
//! - [`CurrentUser`] - 当前用户上下文（显式传入每个服务调用）
//! - [`permissions`] - 角色 × 操作 决策表

pub mod authenticator;
pub mod current_user;
pub mod password;
pub mod permissions;

pub use authenticator::authenticate;
pub use current_user::CurrentUser;
pub use permissions::{Decision, Operation, authorize, require};

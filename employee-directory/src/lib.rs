//! Employee Directory - 单机员工目录
//!
//! # 架构概述
//!
//! 认证用户对员工记录执行增删改查，按角色 (admin / user) 授权，
//! 支持 CSV 导入导出和数据库文件备份。
//!
//! # 模块结构
//!
//! ```text
//! employee-directory/src/
//! ├── core/          # 配置、应用状态
//! ├── auth/          # 认证、当前用户、权限策略
//! ├── db/            # SQLite 连接池与仓储
//! ├── services/      # 员工 CRUD、用户管理、CSV、备份
//! ├── audit/         # 审计日志
//! ├── shell/         # 交互式菜单
//! └── utils/         # 查询构建、校验、日志
//! ```

pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod shell;
pub mod utils;

// Re-export 公共类型
pub use audit::{AuditAction, AuditLevel, AuditLog};
pub use auth::{CurrentUser, Decision, Operation};
pub use self::core::{AppState, Config};
pub use shell::Shell;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

pub fn print_banner() {
    println!(
        r#"
  ___            _                         ___  _            _
 | __|_ __  _ __| |___ _  _ ___ ___       |   \(_)_ _ ___ __| |_ ___ _ _ _  _
 | _|| '  \| '_ \ / _ \ || / -_) -_)      | |) | | '_/ -_) _|  _/ _ \ '_| || |
 |___|_|_|_| .__/_\___/\_, \___\___|      |___/|_|_| \___\__|\__\___/_|  \_, |
           |_|         |__/                                              |__/
    "#
    );
}

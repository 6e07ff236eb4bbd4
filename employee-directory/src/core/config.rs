use std::path::PathBuf;

/// 应用配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖（`.env` 文件同样生效）：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DIRECTORY_DB_PATH | employee_directory.db | SQLite 数据库文件 |
/// | DIRECTORY_AUDIT_LOG | employee_directory.log | 审计日志文件 |
/// | DIRECTORY_BACKUP_DIR | backups | 备份目录 |
/// | LOG_LEVEL | warn | tracing 过滤级别 |
/// | LOG_DIR | (无) | 滚动日志目录，未设置时输出到 stderr |
///
/// # 示例
///
/// ```ignore
/// DIRECTORY_DB_PATH=/data/staff.db LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 数据库文件路径
    pub db_path: PathBuf,
    /// 审计日志文件路径
    pub audit_log_path: PathBuf,
    /// 备份目录
    pub backup_dir: PathBuf,
    /// 日志级别
    pub log_level: String,
    /// 滚动日志目录
    pub log_dir: Option<PathBuf>,
}

pub const DEFAULT_DB_PATH: &str = "employee_directory.db";
pub const DEFAULT_AUDIT_LOG: &str = "employee_directory.log";
pub const DEFAULT_BACKUP_DIR: &str = "backups";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            db_path: std::env::var("DIRECTORY_DB_PATH")
                .unwrap_or_else(|_| DEFAULT_DB_PATH.into())
                .into(),
            audit_log_path: std::env::var("DIRECTORY_AUDIT_LOG")
                .unwrap_or_else(|_| DEFAULT_AUDIT_LOG.into())
                .into(),
            backup_dir: std::env::var("DIRECTORY_BACKUP_DIR")
                .unwrap_or_else(|_| DEFAULT_BACKUP_DIR.into())
                .into(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into()),
            log_dir: std::env::var("LOG_DIR").ok().map(PathBuf::from),
        }
    }

    /// 所有文件放在同一目录下
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        Self {
            db_path: work_dir.join(DEFAULT_DB_PATH),
            audit_log_path: work_dir.join(DEFAULT_AUDIT_LOG),
            backup_dir: work_dir.join(DEFAULT_BACKUP_DIR),
            log_level: DEFAULT_LOG_LEVEL.into(),
            log_dir: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

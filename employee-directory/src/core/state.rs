use crate::audit::AuditLog;
use crate::auth::{self, CurrentUser};
use crate::core::Config;
use crate::db::DbService;
use crate::services::{BackupService, EmployeeService, UserService};
use crate::utils::AppResult;

/// 应用状态 - 持有数据库、审计日志与配置
///
/// 克隆成本很低（连接池和审计文件句柄都是共享引用）。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | audit | AuditLog | 审计日志 |
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbService,
    pub audit: AuditLog,
}

impl AppState {
    /// 打开数据库与审计日志，并确保种子管理员存在
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let db = DbService::new(&config.db_path).await?;
        let audit = AuditLog::open(&config.audit_log_path)?;

        if db.ensure_seed_admin().await? {
            tracing::info!("Seed admin account created");
        }

        tracing::info!(
            db = %config.db_path.display(),
            audit_log = %config.audit_log_path.display(),
            "Application state initialized"
        );
        Ok(Self { config, db, audit })
    }

    /// 校验用户名/密码，成功时返回当前用户上下文
    pub async fn login(&self, username: &str, secret: &str) -> AppResult<Option<CurrentUser>> {
        let user = auth::authenticate(&self.db.pool, &self.audit, username, secret).await?;
        Ok(user.as_ref().map(CurrentUser::from))
    }

    pub fn employees(&self) -> EmployeeService {
        EmployeeService::new(self.db.pool.clone(), self.audit.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.db.pool.clone(), self.audit.clone())
    }

    pub fn backups(&self) -> BackupService {
        BackupService::new(self.db.clone(), self.audit.clone())
    }
}

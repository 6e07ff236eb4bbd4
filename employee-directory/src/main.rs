use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use employee_directory::{AppState, Config, Shell, init_logger_with_file, print_banner};

/// Employee directory - interactive, role-gated staff records.
///
/// Every option can also be set through its environment variable or `.env`.
#[derive(Parser, Debug)]
#[command(name = "employee-directory")]
#[command(version, about, long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "DIRECTORY_DB_PATH")]
    db: Option<PathBuf>,

    /// Audit log file
    #[arg(long, env = "DIRECTORY_AUDIT_LOG")]
    audit_log: Option<PathBuf>,

    /// Default backup directory
    #[arg(long, env = "DIRECTORY_BACKUP_DIR")]
    backup_dir: Option<PathBuf>,

    /// tracing filter, e.g. `info` or `employee_directory=debug`
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Write logs to daily rolling files in this directory
    #[arg(long, env = "LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    /// 命令行参数覆盖环境变量
    fn into_config(self) -> Config {
        let mut config = Config::from_env();
        if let Some(db) = self.db {
            config.db_path = db;
        }
        if let Some(audit_log) = self.audit_log {
            config.audit_log_path = audit_log;
        }
        if let Some(backup_dir) = self.backup_dir {
            config.backup_dir = backup_dir;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.log_dir.is_some() {
            config.log_dir = self.log_dir;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env 先于参数解析加载
    dotenvy::dotenv().ok();
    let config = Cli::parse().into_config();

    // 2. 日志
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let log_dir = config.log_dir.as_ref().and_then(|d| d.to_str());
    init_logger_with_file(Some(&config.log_level), log_dir);

    print_banner();
    tracing::info!("Employee directory starting...");

    // 3. 数据库、审计日志、种子管理员
    let state = AppState::initialize(config)
        .await
        .context("Failed to initialize application state")?;

    // 4. 交互式菜单
    let stdin = io::stdin();
    let mut shell = Shell::new(state, stdin.lock(), io::stdout());
    if let Err(e) = shell.run().await {
        tracing::error!("Shell error: {}", e);
        return Err(e);
    }

    Ok(())
}

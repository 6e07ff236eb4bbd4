//! Append-only audit log file

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::types::{AuditAction, AuditLevel};
use crate::utils::{AppError, AppResult};

/// Timestamp layout of every line, millisecond precision
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

struct AuditFile {
    path: PathBuf,
    file: Mutex<File>,
}

/// Audit log handle
///
/// Cheap to clone; all clones append to the same file. A disabled log only
/// mirrors entries to `tracing`.
#[derive(Clone, Default)]
pub struct AuditLog {
    inner: Option<Arc<AuditFile>>,
}

impl AuditLog {
    /// Open `path` for appending, creating it (and its parent directory)
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::io(format!("Failed to create audit log directory: {e}"))
                    .with_detail("path", parent.display().to_string())
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                AppError::io(format!("Failed to open audit log: {e}"))
                    .with_detail("path", path.display().to_string())
            })?;

        Ok(Self {
            inner: Some(Arc::new(AuditFile {
                path: path.to_path_buf(),
                file: Mutex::new(file),
            })),
        })
    }

    /// Log that writes nowhere but `tracing`
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Backing file, `None` when disabled
    pub fn path(&self) -> Option<&Path> {
        self.inner.as_ref().map(|f| f.path.as_path())
    }

    /// Append one entry.
    ///
    /// A failed write is reported through `tracing` and never fails the
    /// operation being audited.
    pub fn record(&self, level: AuditLevel, action: AuditAction, message: impl AsRef<str>) {
        let message = message.as_ref();
        match level {
            AuditLevel::Info => tracing::info!(target: "audit", %action, "{message}"),
            AuditLevel::Warning => tracing::warn!(target: "audit", %action, "{message}"),
            AuditLevel::Error => tracing::error!(target: "audit", %action, "{message}"),
        }

        let Some(inner) = &self.inner else {
            return;
        };

        let line = format_line(&chrono::Local::now(), level, action, message);
        let mut file = inner.file.lock();
        if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
            tracing::error!(
                path = %inner.path.display(),
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    pub fn info(&self, action: AuditAction, message: impl AsRef<str>) {
        self.record(AuditLevel::Info, action, message);
    }

    pub fn warn(&self, action: AuditAction, message: impl AsRef<str>) {
        self.record(AuditLevel::Warning, action, message);
    }

    pub fn error(&self, action: AuditAction, message: impl AsRef<str>) {
        self.record(AuditLevel::Error, action, message);
    }

    /// Record a failed operation at ERROR, permission denials included
    pub fn failure(&self, action: AuditAction, context: impl AsRef<str>, err: &AppError) {
        self.error(
            action,
            format!("{} failed: {} ({})", context.as_ref(), err.message, err.code),
        );
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog").field("path", &self.path()).finish()
    }
}

/// Render one line, including the trailing newline
fn format_line<Tz>(
    at: &chrono::DateTime<Tz>,
    level: AuditLevel,
    action: AuditAction,
    message: &str,
) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    // 单行记录：消息中的换行会破坏按行解析
    let message = message.replace(['\r', '\n'], " ");
    format!(
        "{} - {} - [{}] {}\n",
        at.format(TIMESTAMP_FORMAT),
        level,
        action,
        message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::ErrorCode;

    #[test]
    fn test_line_format() {
        let at = chrono::Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .unwrap()
            + chrono::Duration::milliseconds(42);
        let line = format_line(
            &at,
            AuditLevel::Info,
            AuditAction::EmployeeCreated,
            "Employee added: Ana, Eng, Dev",
        );
        assert_eq!(
            line,
            "2024-03-09 14:05:07,042 - INFO - [employee_created] Employee added: Ana, Eng, Dev\n"
        );
    }

    #[test]
    fn test_line_format_flattens_newlines() {
        let at = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let line = format_line(&at, AuditLevel::Error, AuditAction::UserDeleted, "a\nb");
        assert!(line.ends_with("[user_deleted] a b\n"));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_open_appends_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("audit.log");

        let log = AuditLog::open(&path).unwrap();
        log.info(AuditAction::LoginSuccess, "User 'admin' logged in");
        log.clone()
            .warn(AuditAction::LoginFailed, "Failed login attempt for 'bo'");
        drop(log);

        let reopened = AuditLog::open(&path).unwrap();
        reopened.error(AuditAction::BackupCreated, "Backup failed");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(" - INFO - [login_success] User 'admin' logged in"));
        assert!(lines[1].contains(" - WARNING - [login_failed] "));
        assert!(lines[2].contains(" - ERROR - [backup_created] Backup failed"));
    }

    #[test]
    fn test_failure_is_error_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let log = AuditLog::open(&path).unwrap();

        log.failure(
            AuditAction::EmployeeDeleted,
            "Delete employee 3",
            &AppError::permission_denied("Permission denied: cannot delete employee"),
        );
        log.failure(
            AuditAction::EmployeeCreated,
            "Add employee",
            &AppError::new(ErrorCode::DatabaseError),
        );

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[0].contains(" - ERROR - [employee_deleted] Delete employee 3 failed"));
        assert!(lines[0].contains("E2001"));
        assert!(lines[1].contains(" - ERROR - [employee_created] Add employee failed"));
        assert!(lines[1].contains("E9002"));
    }

    #[test]
    fn test_disabled_log_writes_nothing() {
        let log = AuditLog::disabled();
        log.info(AuditAction::LoginSuccess, "nobody sees this");
        assert!(log.path().is_none());
    }
}

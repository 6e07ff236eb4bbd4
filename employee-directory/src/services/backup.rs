//! Database file backup

use std::path::{Path, PathBuf};

use crate::audit::{AuditAction, AuditLog};
use crate::auth::{CurrentUser, Operation, require};
use crate::db::DbService;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Backup file name prefix
pub const BACKUP_PREFIX: &str = "employee_directory_backup_";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Backup service
#[derive(Clone)]
pub struct BackupService {
    db: DbService,
    audit: AuditLog,
}

impl BackupService {
    pub fn new(db: DbService, audit: AuditLog) -> Self {
        Self { db, audit }
    }

    /// Copy the database file into `target_dir` (admin).
    ///
    /// Returns the path of the new file. Existing backups are never
    /// overwritten.
    pub async fn backup(&self, user: &CurrentUser, target_dir: impl AsRef<Path>) -> AppResult<PathBuf> {
        let target_dir = target_dir.as_ref();
        match self.backup_inner(user, target_dir).await {
            Ok(path) => {
                self.audit.info(
                    AuditAction::BackupCreated,
                    format!("Database backed up to {} by '{}'", path.display(), user.username),
                );
                Ok(path)
            }
            Err(e) => {
                self.audit.failure(
                    AuditAction::BackupCreated,
                    format!("Backup to {} by '{}'", target_dir.display(), user.username),
                    &e,
                );
                Err(e)
            }
        }
    }

    async fn backup_inner(&self, user: &CurrentUser, target_dir: &Path) -> AppResult<PathBuf> {
        require(user, Operation::Backup)?;

        let source = self.db.path().ok_or_else(|| {
            AppError::with_message(ErrorCode::InvalidRequest, "In-memory database cannot be backed up")
        })?;

        tokio::fs::create_dir_all(target_dir).await.map_err(|e| {
            AppError::io(format!("Failed to create backup directory: {e}"))
                .with_detail("path", target_dir.display().to_string())
        })?;

        self.db.checkpoint().await?;

        let stamp = chrono::Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let target = next_free_path(target_dir, &stamp).await?;
        tokio::fs::copy(source, &target).await.map_err(|e| {
            AppError::io(format!("Failed to copy database: {e}"))
                .with_detail("path", target.display().to_string())
        })?;

        tracing::info!(path = %target.display(), "Backup written");
        Ok(target)
    }
}

/// `<prefix><stamp>.db`, or `<prefix><stamp>_<n>.db` for the first free n
async fn next_free_path(dir: &Path, stamp: &str) -> AppResult<PathBuf> {
    let mut candidate = dir.join(format!("{BACKUP_PREFIX}{stamp}.db"));
    let mut n = 0u32;
    while tokio::fs::try_exists(&candidate).await? {
        n += 1;
        candidate = dir.join(format!("{BACKUP_PREFIX}{stamp}_{n}.db"));
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    #[tokio::test]
    async fn test_collision_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = "20240309_140507";
        let first = next_free_path(dir.path(), stamp).await.unwrap();
        assert_eq!(
            first.file_name().unwrap(),
            "employee_directory_backup_20240309_140507.db"
        );
        std::fs::write(&first, b"x").unwrap();

        let second = next_free_path(dir.path(), stamp).await.unwrap();
        assert_eq!(
            second.file_name().unwrap(),
            "employee_directory_backup_20240309_140507_1.db"
        );
        std::fs::write(&second, b"x").unwrap();

        let third = next_free_path(dir.path(), stamp).await.unwrap();
        assert!(third.to_string_lossy().ends_with("_2.db"));
    }

    #[tokio::test]
    async fn test_two_backups_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let db = DbService::new(dir.path().join("directory.db")).await.unwrap();
        let service = BackupService::new(db, AuditLog::disabled());
        let admin = CurrentUser::new(1, "admin", Role::Admin);
        let target = dir.path().join("backups");

        let a = service.backup(&admin, &target).await.unwrap();
        let b = service.backup(&admin, &target).await.unwrap();
        assert_ne!(a, b);
        assert!(a.exists() && b.exists());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_backup_denied_and_in_memory() {
        let db = DbService::in_memory().await.unwrap();
        let service = BackupService::new(db, AuditLog::disabled());
        let dir = tempfile::tempdir().unwrap();

        let user = CurrentUser::new(2, "bo", Role::User);
        let err = service.backup(&user, dir.path()).await.unwrap_err();
        assert!(err.is_permission_denied());

        let admin = CurrentUser::new(1, "admin", Role::Admin);
        let err = service.backup(&admin, dir.path()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}

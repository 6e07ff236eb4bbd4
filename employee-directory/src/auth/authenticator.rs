//! Username / secret verification

use shared::models::User;
use sqlx::SqlitePool;

use super::password::verify_password;
use crate::audit::{AuditAction, AuditLog};
use crate::db::repository::user;
use crate::utils::AppResult;

/// Verify credentials.
///
/// `Ok(None)` covers both an unknown username and a wrong secret; the caller
/// cannot tell them apart. Store failures are errors. Every attempt is
/// audited.
pub async fn authenticate(
    pool: &SqlitePool,
    audit: &AuditLog,
    username: &str,
    secret: &str,
) -> AppResult<Option<User>> {
    let username = username.trim();
    let found = user::find_by_username(pool, username).await?;

    match found {
        Some(user) if verify_password(secret, &user.hash_pass) => {
            audit.info(
                AuditAction::LoginSuccess,
                format!("User '{}' logged in as {}", user.username, user.role),
            );
            Ok(Some(user))
        }
        _ => {
            audit.warn(
                AuditAction::LoginFailed,
                format!("Failed login attempt for '{username}'"),
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::db::DbService;
    use shared::models::Role;

    async fn setup() -> (DbService, AuditLog, tempfile::TempDir) {
        let db = DbService::in_memory().await.unwrap();
        db.ensure_seed_admin().await.unwrap();
        let hash = hash_password("pw-bo").unwrap();
        user::create(&db.pool, "bo", &hash, Role::User, false)
            .await
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::open(dir.path().join("audit.log")).unwrap();
        (db, audit, dir)
    }

    #[tokio::test]
    async fn test_seed_admin_authenticates() {
        let (db, audit, _dir) = setup().await;
        let user = authenticate(&db.pool, &audit, "admin", "admin123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_wrong_secret_and_unknown_user_are_none() {
        let (db, audit, _dir) = setup().await;
        assert!(
            authenticate(&db.pool, &audit, "bo", "wrong")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            authenticate(&db.pool, &audit, "ghost", "pw-bo")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_attempts_are_audited() {
        let (db, audit, _dir) = setup().await;
        authenticate(&db.pool, &audit, "bo", "pw-bo").await.unwrap();
        authenticate(&db.pool, &audit, "bo", "nope").await.unwrap();

        let content = std::fs::read_to_string(audit.path().unwrap()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(" - INFO - [login_success] User 'bo' logged in as user"));
        assert!(lines[1].contains(" - WARNING - [login_failed] Failed login attempt for 'bo'"));
    }
}

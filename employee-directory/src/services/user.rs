//! User management

use shared::models::{Role, User, UserCreate};
use sqlx::SqlitePool;

use crate::audit::{AuditAction, AuditLog};
use crate::auth::password::hash_password;
use crate::auth::{CurrentUser, Operation, require};
use crate::db::repository::user;
use crate::utils::validation::{MAX_PASSWORD_LEN, MAX_USERNAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// User service
#[derive(Debug, Clone)]
pub struct UserService {
    pool: SqlitePool,
    audit: AuditLog,
}

impl UserService {
    pub fn new(pool: SqlitePool, audit: AuditLog) -> Self {
        Self { pool, audit }
    }

    /// Create an account (admin)
    pub async fn register(&self, user: &CurrentUser, data: UserCreate) -> AppResult<User> {
        let username = data.username.trim().to_string();
        match self.register_inner(user, &username, &data.password, data.role).await {
            Ok(created) => {
                self.audit.info(
                    AuditAction::UserRegistered,
                    format!(
                        "User '{}' registered as {} by '{}'",
                        created.username, created.role, user.username
                    ),
                );
                Ok(created)
            }
            Err(e) => {
                self.audit.failure(
                    AuditAction::UserRegistered,
                    format!("Register user '{username}' by '{}'", user.username),
                    &e,
                );
                Err(e)
            }
        }
    }

    async fn register_inner(
        &self,
        user: &CurrentUser,
        username: &str,
        password: &str,
        role: Role,
    ) -> AppResult<User> {
        require(user, Operation::ManageUsers)?;
        validate_required_text(username, "Username", MAX_USERNAME_LEN)?;
        validate_required_text(password, "Password", MAX_PASSWORD_LEN)?;

        let hash_pass = hash_password(password)?;
        Ok(user::create(&self.pool, username, &hash_pass, role, false).await?)
    }

    /// Delete an account (admin); returns affected rows
    ///
    /// System accounts and the caller's own account are refused.
    pub async fn delete_user(&self, user: &CurrentUser, user_id: i64) -> AppResult<u64> {
        match self.delete_inner(user, user_id).await {
            Ok(affected) => {
                self.audit.info(
                    AuditAction::UserDeleted,
                    format!(
                        "User {user_id} deleted by '{}' ({affected} row(s))",
                        user.username
                    ),
                );
                Ok(affected)
            }
            Err(e) => {
                self.audit.failure(
                    AuditAction::UserDeleted,
                    format!("Delete user {user_id} by '{}'", user.username),
                    &e,
                );
                Err(e)
            }
        }
    }

    async fn delete_inner(&self, user: &CurrentUser, user_id: i64) -> AppResult<u64> {
        require(user, Operation::ManageUsers)?;

        if user_id == user.id {
            return Err(AppError::new(ErrorCode::UserCannotDeleteSelf));
        }

        let Some(target) = user::find_by_id(&self.pool, user_id).await? else {
            return Ok(0);
        };
        if target.is_system {
            return Err(AppError::with_message(
                ErrorCode::UserIsSystem,
                format!("User '{}' is a system account and cannot be deleted", target.username),
            ));
        }

        Ok(user::delete(&self.pool, user_id).await?)
    }

    /// Accounts holding `role`, ordered by username
    pub async fn list_users_by_role(&self, user: &CurrentUser, role: Role) -> AppResult<Vec<User>> {
        require(user, Operation::ListUsers)?;
        Ok(user::find_by_role(&self.pool, role).await?)
    }
}

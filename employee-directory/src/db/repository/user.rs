//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{Role, User};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, username, hash_pass, role, is_system FROM users";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_role(pool: &SqlitePool, role: Role) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} WHERE role = ? ORDER BY username");
    let users = sqlx::query_as::<_, User>(&sql)
        .bind(role)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Insert a user with an already-hashed secret
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    hash_pass: &str,
    role: Role,
    is_system: bool,
) -> RepoResult<User> {
    if find_by_username(pool, username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Username '{}' already exists",
            username
        )));
    }

    let result = sqlx::query(
        "INSERT INTO users (username, hash_pass, role, is_system) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(username)
    .bind(hash_pass)
    .bind(role)
    .bind(is_system)
    .execute(pool)
    .await?;

    find_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Hard delete a non-system user; returns affected rows
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ? AND is_system = 0")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let db = DbService::in_memory().await.unwrap();
        create(&db.pool, "bo", "h", Role::User, false).await.unwrap();
        let err = create(&db.pool, "bo", "h", Role::Admin, false)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_find_by_role() {
        let db = DbService::in_memory().await.unwrap();
        create(&db.pool, "zed", "h", Role::User, false).await.unwrap();
        create(&db.pool, "amy", "h", Role::User, false).await.unwrap();
        create(&db.pool, "root", "h", Role::Admin, false).await.unwrap();

        let users: Vec<String> = find_by_role(&db.pool, Role::User)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(users, vec!["amy", "zed"]);
    }

    #[tokio::test]
    async fn test_delete_skips_system_users() {
        let db = DbService::in_memory().await.unwrap();
        let system = create(&db.pool, "admin", "h", Role::Admin, true).await.unwrap();
        let regular = create(&db.pool, "bo", "h", Role::User, false).await.unwrap();

        assert_eq!(delete(&db.pool, system.id).await.unwrap(), 0);
        assert_eq!(delete(&db.pool, regular.id).await.unwrap(), 1);
        assert!(find_by_id(&db.pool, system.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_deleting_owner_unlinks_employee() {
        let db = DbService::in_memory().await.unwrap();
        let bo = create(&db.pool, "bo", "h", Role::User, false).await.unwrap();
        sqlx::query("INSERT INTO employees (name, department, position, owner_user_id) VALUES ('Bo', 'Ops', 'Tech', ?)")
            .bind(bo.id)
            .execute(&db.pool)
            .await
            .unwrap();

        delete(&db.pool, bo.id).await.unwrap();
        let owner: Option<i64> = sqlx::query_scalar("SELECT owner_user_id FROM employees")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(owner, None);
    }
}

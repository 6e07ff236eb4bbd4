//! Employee Repository

use super::{RepoError, RepoResult};
use crate::utils::query_builder::{EMPLOYEE_COLUMNS, SearchQuery};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id");
    let rows = sqlx::query_as::<_, Employee>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?");
    let row = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// Run a statement produced by the search query builder
pub async fn search(pool: &SqlitePool, query: &SearchQuery) -> RepoResult<Vec<Employee>> {
    let rows = query
        .apply_bindings(sqlx::query_as::<_, Employee>(&query.sql))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: &EmployeeCreate) -> RepoResult<Employee> {
    let result = sqlx::query(
        "INSERT INTO employees (name, department, position, contact, job_history, skills, owner_user_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&data.name)
    .bind(&data.department)
    .bind(&data.position)
    .bind(&data.contact)
    .bind(&data.job_history)
    .bind(&data.skills)
    .bind(data.owner_user_id)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Replace the descriptive fields of any row; returns affected rows
pub async fn update(pool: &SqlitePool, id: i64, data: &EmployeeUpdate) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE employees SET name = ?1, department = ?2, position = ?3, contact = ?4, job_history = ?5, skills = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.department)
    .bind(&data.position)
    .bind(&data.contact)
    .bind(&data.job_history)
    .bind(&data.skills)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Replace the descriptive fields only when the row is owned by `owner_user_id`
pub async fn update_owned(
    pool: &SqlitePool,
    id: i64,
    owner_user_id: i64,
    data: &EmployeeUpdate,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE employees SET name = ?1, department = ?2, position = ?3, contact = ?4, job_history = ?5, skills = ?6 WHERE id = ?7 AND owner_user_id = ?8",
    )
    .bind(&data.name)
    .bind(&data.department)
    .bind(&data.position)
    .bind(&data.contact)
    .bind(&data.job_history)
    .bind(&data.skills)
    .bind(id)
    .bind(owner_user_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn set_owner(pool: &SqlitePool, id: i64, owner_user_id: Option<i64>) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE employees SET owner_user_id = ? WHERE id = ?")
        .bind(owner_user_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

/// Hard delete; a missing id is not an error
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::utils::query_builder::{EmployeeColumn, build_search};

    fn sample(name: &str, department: &str) -> EmployeeCreate {
        EmployeeCreate::new(name, department, "Dev", None, None, Some("Rust".into()))
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let db = DbService::in_memory().await.unwrap();
        let a = create(&db.pool, &sample("Ana", "Eng")).await.unwrap();
        let b = create(&db.pool, &sample("Bo", "Eng")).await.unwrap();
        assert!(a.id > 0);
        assert!(b.id > a.id);
        assert_eq!(count(&db.pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_report_affected_rows() {
        let db = DbService::in_memory().await.unwrap();
        let e = create(&db.pool, &sample("Ana", "Eng")).await.unwrap();

        let mut data = EmployeeUpdate::from(&e);
        data.position = "Lead".into();
        assert_eq!(update(&db.pool, e.id, &data).await.unwrap(), 1);
        assert_eq!(update(&db.pool, e.id + 100, &data).await.unwrap(), 0);
        assert_eq!(
            find_by_id(&db.pool, e.id).await.unwrap().unwrap().position,
            "Lead"
        );

        assert_eq!(delete(&db.pool, e.id).await.unwrap(), 1);
        assert_eq!(delete(&db.pool, e.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_owned_requires_matching_owner() {
        let db = DbService::in_memory().await.unwrap();
        sqlx::query("INSERT INTO users (id, username, hash_pass, role) VALUES (5, 'ana', 'x', 'user')")
            .execute(&db.pool)
            .await
            .unwrap();
        let e = create(&db.pool, &sample("Ana", "Eng")).await.unwrap();
        let data = EmployeeUpdate::from(&e);

        assert_eq!(update_owned(&db.pool, e.id, 5, &data).await.unwrap(), 0);
        assert_eq!(set_owner(&db.pool, e.id, Some(5)).await.unwrap(), 1);
        assert_eq!(update_owned(&db.pool, e.id, 5, &data).await.unwrap(), 1);
        assert_eq!(update_owned(&db.pool, e.id, 6, &data).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_with_filter_sort_and_pages() {
        let db = DbService::in_memory().await.unwrap();
        for (name, dept) in [
            ("Carl", "Sales"),
            ("Abe", "Sales"),
            ("Bea", "Eng"),
            ("Dee", "Sales"),
        ] {
            create(&db.pool, &sample(name, dept)).await.unwrap();
        }

        let query = build_search(
            "",
            Some(EmployeeColumn::Name),
            Some((EmployeeColumn::Department, "Sales")),
            2,
            1,
        );
        let page1: Vec<String> = search(&db.pool, &query)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(page1, vec!["Abe", "Carl"]);

        let query = build_search(
            "",
            Some(EmployeeColumn::Name),
            Some((EmployeeColumn::Department, "Sales")),
            2,
            2,
        );
        let page2 = search(&db.pool, &query).await.unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].name, "Dee");
    }

    #[tokio::test]
    async fn test_search_criteria_is_bound_not_interpolated() {
        let db = DbService::in_memory().await.unwrap();
        create(&db.pool, &sample("Ana", "Eng")).await.unwrap();

        let query = build_search("' OR 1=1 --", None, None, 10, 1);
        assert!(search(&db.pool, &query).await.unwrap().is_empty());
        assert_eq!(count(&db.pool).await.unwrap(), 1);
    }
}

//! Database Module
//!
//! Handles the SQLite connection pool, schema bootstrap and the seed admin.

pub mod repository;

use crate::auth::password;
use crate::utils::AppError;
use repository::user;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Seed admin credentials created at first startup
pub const SEED_ADMIN_USERNAME: &str = "admin";
pub const SEED_ADMIN_PASSWORD: &str = "admin123";

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        hash_pass TEXT NOT NULL,
        role TEXT NOT NULL CHECK (role IN ('admin', 'user')),
        is_system INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        department TEXT NOT NULL,
        position TEXT NOT NULL,
        contact TEXT,
        job_history TEXT,
        skills TEXT,
        owner_user_id INTEGER REFERENCES users(id) ON DELETE SET NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_employees_owner ON employees(owner_user_id)",
];

/// Database service: owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
    /// Backing file, `None` for in-memory databases
    path: Option<PathBuf>,
}

impl DbService {
    /// Open (or create) the database file in WAL mode and ensure the schema
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, AppError> {
        let db_path = db_path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(path = %db_path.display(), "Database connection established (SQLite WAL)");

        let service = Self {
            pool,
            path: Some(db_path.to_path_buf()),
        };
        service.ensure_schema().await?;
        Ok(service)
    }

    /// In-memory database (one connection, kept alive for the pool's lifetime)
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self { pool, path: None };
        service.ensure_schema().await?;
        Ok(service)
    }

    /// Backing file path
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn ensure_schema(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to create schema: {e}")))?;
        }
        tracing::debug!("Database schema ensured");
        Ok(())
    }

    /// Flush the WAL into the main database file.
    ///
    /// After this the file on disk holds every committed row and can be
    /// copied verbatim.
    pub async fn checkpoint(&self) -> Result<(), AppError> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("WAL checkpoint failed: {e}")))?;
        Ok(())
    }

    /// Create the seed admin account if no user named `admin` exists.
    ///
    /// Returns `true` when the account was created.
    pub async fn ensure_seed_admin(&self) -> Result<bool, AppError> {
        if user::find_by_username(&self.pool, SEED_ADMIN_USERNAME)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let hash_pass = password::hash_password(SEED_ADMIN_PASSWORD)?;
        user::create(
            &self.pool,
            SEED_ADMIN_USERNAME,
            &hash_pass,
            shared::models::Role::Admin,
            true,
        )
        .await?;
        tracing::warn!(
            "Seed admin account '{}' created with the default password; change it",
            SEED_ADMIN_USERNAME
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_schema() {
        let db = DbService::in_memory().await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(db.path().is_none());
    }

    #[tokio::test]
    async fn test_seed_admin_created_once() {
        let db = DbService::in_memory().await.unwrap();
        assert!(db.ensure_seed_admin().await.unwrap());
        assert!(!db.ensure_seed_admin().await.unwrap());

        let admin = user::find_by_username(&db.pool, SEED_ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_system);
        assert_eq!(admin.role, shared::models::Role::Admin);
        assert_ne!(admin.hash_pass, SEED_ADMIN_PASSWORD);
    }

    #[tokio::test]
    async fn test_file_database_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.db");
        {
            let db = DbService::new(&path).await.unwrap();
            sqlx::query("INSERT INTO employees (name, department, position) VALUES ('A', 'B', 'C')")
                .execute(&db.pool)
                .await
                .unwrap();
            db.checkpoint().await.unwrap();
            db.pool.close().await;
        }
        let db = DbService::new(&path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}

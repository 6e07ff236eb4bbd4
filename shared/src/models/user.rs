//! User Model

use super::Role;
use serde::{Deserialize, Serialize};

/// User account (credential store row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub hash_pass: String,
    pub role: Role,
    /// Seed account, cannot be deleted
    #[serde(default)]
    pub is_system: bool,
}

/// Register user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub role: Role,
}

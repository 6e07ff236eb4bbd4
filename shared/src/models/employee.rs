//! Employee Model

use serde::{Deserialize, Serialize};

/// Employee record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub position: String,
    pub contact: Option<String>,
    pub job_history: Option<String>,
    pub skills: Option<String>,
    /// User account allowed to update this record without admin rights
    pub owner_user_id: Option<i64>,
}

/// Create employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub department: String,
    pub position: String,
    pub contact: Option<String>,
    pub job_history: Option<String>,
    pub skills: Option<String>,
    #[serde(default)]
    pub owner_user_id: Option<i64>,
}

/// Update employee payload (full replacement of the descriptive fields)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub name: String,
    pub department: String,
    pub position: String,
    pub contact: Option<String>,
    pub job_history: Option<String>,
    pub skills: Option<String>,
}

impl EmployeeCreate {
    /// Build a create payload from the six descriptive fields.
    pub fn new(
        name: impl Into<String>,
        department: impl Into<String>,
        position: impl Into<String>,
        contact: Option<String>,
        job_history: Option<String>,
        skills: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
            position: position.into(),
            contact,
            job_history,
            skills,
            owner_user_id: None,
        }
    }

    /// Link the new record to a user account.
    pub fn owned_by(mut self, user_id: i64) -> Self {
        self.owner_user_id = Some(user_id);
        self
    }
}

impl From<&Employee> for EmployeeUpdate {
    fn from(e: &Employee) -> Self {
        Self {
            name: e.name.clone(),
            department: e.department.clone(),
            position: e.position.clone(),
            contact: e.contact.clone(),
            job_history: e.job_history.clone(),
            skills: e.skills.clone(),
        }
    }
}

impl std::fmt::Display for Employee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} | {} | {} | contact: {} | history: {} | skills: {}",
            self.id,
            self.name,
            self.department,
            self.position,
            self.contact.as_deref().unwrap_or("-"),
            self.job_history.as_deref().unwrap_or("-"),
            self.skills.as_deref().unwrap_or("-"),
        )
    }
}

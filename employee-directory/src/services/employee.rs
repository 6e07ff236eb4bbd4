//! Employee CRUD Service

use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};
use shared::util::non_blank;
use sqlx::SqlitePool;

use crate::audit::{AuditAction, AuditLog};
use crate::auth::{CurrentUser, Decision, Operation, require};
use crate::db::repository::employee;
use crate::utils::query_builder::{EmployeeColumn, build_search};
use crate::utils::validation::validate_employee_fields;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Default page size
pub const DEFAULT_PER_PAGE: i64 = 10;
/// Largest page the service will request
pub const MAX_PER_PAGE: i64 = 100;

/// Search parameters as entered by the operator
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Substring matched against every text column
    pub criteria: String,
    pub sort_by: Option<EmployeeColumn>,
    pub filter: Option<(EmployeeColumn, String)>,
    /// Defaults to [`DEFAULT_PER_PAGE`]
    pub per_page: Option<i64>,
    /// 1-based, defaults to 1
    pub page: Option<i64>,
}

impl SearchRequest {
    pub fn new(criteria: impl Into<String>) -> Self {
        Self {
            criteria: criteria.into(),
            ..Default::default()
        }
    }

    pub fn sort_by(mut self, column: EmployeeColumn) -> Self {
        self.sort_by = Some(column);
        self
    }

    pub fn filter(mut self, column: EmployeeColumn, value: impl Into<String>) -> Self {
        self.filter = Some((column, value.into()));
        self
    }

    pub fn page(mut self, per_page: i64, page: i64) -> Self {
        self.per_page = Some(per_page);
        self.page = Some(page);
        self
    }

    /// Page size clamped to `1..=MAX_PER_PAGE`
    pub fn effective_per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// Page number clamped to `>= 1`
    pub fn effective_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Employee service
#[derive(Debug, Clone)]
pub struct EmployeeService {
    pub(crate) pool: SqlitePool,
    pub(crate) audit: AuditLog,
}

impl EmployeeService {
    pub fn new(pool: SqlitePool, audit: AuditLog) -> Self {
        Self { pool, audit }
    }

    /// Add an employee (admin)
    pub async fn add(&self, user: &CurrentUser, data: EmployeeCreate) -> AppResult<Employee> {
        let summary = format!("{}, {}, {}", data.name, data.department, data.position);
        match self.add_inner(user, data).await {
            Ok(employee) => {
                self.audit.info(
                    AuditAction::EmployeeCreated,
                    format!(
                        "Employee added: {}, {}, {}",
                        employee.name, employee.department, employee.position
                    ),
                );
                Ok(employee)
            }
            Err(e) => {
                self.audit.failure(
                    AuditAction::EmployeeCreated,
                    format!("Add employee ({summary}) by '{}'", user.username),
                    &e,
                );
                Err(e)
            }
        }
    }

    async fn add_inner(&self, user: &CurrentUser, data: EmployeeCreate) -> AppResult<Employee> {
        require(user, Operation::AddEmployee)?;
        let data = normalize_create(data);
        validate_employee_fields(
            &data.name,
            &data.department,
            &data.position,
            &data.contact,
            &data.job_history,
            &data.skills,
        )?;
        let employee = employee::create(&self.pool, &data).await?;
        tracing::debug!(id = employee.id, "Employee inserted");
        Ok(employee)
    }

    /// Fetch one employee by id
    pub async fn get(&self, user: &CurrentUser, id: i64) -> AppResult<Employee> {
        require(user, Operation::ViewEmployee)?;
        employee::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| employee_not_found(id))
    }

    /// Replace the descriptive fields of an employee.
    ///
    /// Admins may update any row; other users only rows linked to their
    /// account.
    pub async fn update(
        &self,
        user: &CurrentUser,
        id: i64,
        data: EmployeeUpdate,
    ) -> AppResult<Employee> {
        match self.update_inner(user, id, data).await {
            Ok(employee) => {
                self.audit.info(
                    AuditAction::EmployeeUpdated,
                    format!(
                        "Employee {} updated by '{}': {}, {}, {}",
                        employee.id,
                        user.username,
                        employee.name,
                        employee.department,
                        employee.position
                    ),
                );
                Ok(employee)
            }
            Err(e) => {
                self.audit.failure(
                    AuditAction::EmployeeUpdated,
                    format!("Update employee {id} by '{}'", user.username),
                    &e,
                );
                Err(e)
            }
        }
    }

    async fn update_inner(
        &self,
        user: &CurrentUser,
        id: i64,
        data: EmployeeUpdate,
    ) -> AppResult<Employee> {
        let decision = require(user, Operation::UpdateEmployee)?;

        if employee::find_by_id(&self.pool, id).await?.is_none() {
            return Err(employee_not_found(id));
        }

        let data = normalize_update(data);
        validate_employee_fields(
            &data.name,
            &data.department,
            &data.position,
            &data.contact,
            &data.job_history,
            &data.skills,
        )?;

        let affected = match decision {
            Decision::OwnRecordsOnly => {
                employee::update_owned(&self.pool, id, user.id, &data).await?
            }
            _ => employee::update(&self.pool, id, &data).await?,
        };

        if affected == 0 {
            return Err(AppError::permission_denied(format!(
                "Permission denied: employee {id} is not your record"
            ))
            .with_detail("employee_id", id));
        }

        employee::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| employee_not_found(id))
    }

    /// Delete an employee (admin); an absent id yields 0
    pub async fn delete(&self, user: &CurrentUser, id: i64) -> AppResult<u64> {
        match self.delete_inner(user, id).await {
            Ok(affected) => {
                self.audit.info(
                    AuditAction::EmployeeDeleted,
                    format!(
                        "Employee {id} deleted by '{}' ({affected} row(s))",
                        user.username
                    ),
                );
                Ok(affected)
            }
            Err(e) => {
                self.audit.failure(
                    AuditAction::EmployeeDeleted,
                    format!("Delete employee {id} by '{}'", user.username),
                    &e,
                );
                Err(e)
            }
        }
    }

    async fn delete_inner(&self, user: &CurrentUser, id: i64) -> AppResult<u64> {
        require(user, Operation::DeleteEmployee)?;
        Ok(employee::delete(&self.pool, id).await?)
    }

    /// Paginated substring search, open to every role
    pub async fn search(
        &self,
        user: &CurrentUser,
        request: &SearchRequest,
    ) -> AppResult<Vec<Employee>> {
        require(user, Operation::SearchEmployees)?;

        let query = build_search(
            &request.criteria,
            request.sort_by,
            request
                .filter
                .as_ref()
                .map(|(column, value)| (*column, value.as_str())),
            request.effective_per_page(),
            request.effective_page(),
        );
        let rows = employee::search(&self.pool, &query).await?;
        tracing::debug!(
            criteria = %request.criteria,
            results = rows.len(),
            "Employee search"
        );
        Ok(rows)
    }

    /// Every employee in id order (admin)
    pub async fn list_all(&self, user: &CurrentUser) -> AppResult<Vec<Employee>> {
        require(user, Operation::ExportCsv)?;
        Ok(employee::find_all(&self.pool).await?)
    }

    /// Link an employee to a user account, or unlink with `None` (admin)
    pub async fn assign_owner(
        &self,
        user: &CurrentUser,
        employee_id: i64,
        owner_user_id: Option<i64>,
    ) -> AppResult<()> {
        let result = self
            .assign_owner_inner(user, employee_id, owner_user_id)
            .await;
        let target = owner_user_id
            .map(|id| format!("user {id}"))
            .unwrap_or_else(|| "nobody".to_string());

        match &result {
            Ok(()) => self.audit.info(
                AuditAction::EmployeeOwnerAssigned,
                format!("Employee {employee_id} linked to {target} by '{}'", user.username),
            ),
            Err(e) => self.audit.failure(
                AuditAction::EmployeeOwnerAssigned,
                format!("Link employee {employee_id} to {target} by '{}'", user.username),
                e,
            ),
        }
        result
    }

    async fn assign_owner_inner(
        &self,
        user: &CurrentUser,
        employee_id: i64,
        owner_user_id: Option<i64>,
    ) -> AppResult<()> {
        require(user, Operation::AssignOwner)?;

        if let Some(owner) = owner_user_id
            && crate::db::repository::user::find_by_id(&self.pool, owner)
                .await?
                .is_none()
        {
            return Err(
                AppError::with_message(ErrorCode::UserNotFound, format!("User {owner} not found"))
                    .with_detail("user_id", owner),
            );
        }

        match employee::set_owner(&self.pool, employee_id, owner_user_id).await? {
            0 => Err(employee_not_found(employee_id)),
            _ => Ok(()),
        }
    }

    /// Number of stored employees
    pub async fn count(&self, user: &CurrentUser) -> AppResult<i64> {
        require(user, Operation::ViewEmployee)?;
        Ok(employee::count(&self.pool).await?)
    }
}

fn employee_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found"))
        .with_detail("employee_id", id)
}

pub(crate) fn normalize_create(data: EmployeeCreate) -> EmployeeCreate {
    EmployeeCreate {
        name: data.name.trim().to_string(),
        department: data.department.trim().to_string(),
        position: data.position.trim().to_string(),
        contact: non_blank(data.contact),
        job_history: non_blank(data.job_history),
        skills: non_blank(data.skills),
        owner_user_id: data.owner_user_id,
    }
}

fn normalize_update(data: EmployeeUpdate) -> EmployeeUpdate {
    EmployeeUpdate {
        name: data.name.trim().to_string(),
        department: data.department.trim().to_string(),
        position: data.position.trim().to_string(),
        contact: non_blank(data.contact),
        job_history: non_blank(data.job_history),
        skills: non_blank(data.skills),
    }
}

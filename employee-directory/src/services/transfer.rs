//! CSV import / export
//!
//! Layout: header row, then one row per employee:
//! `ID,Name,Department,Position,Contact,Job History,Skills`.
//! The ID column is written on export and ignored on import.

use std::path::Path;

use shared::models::{Employee, EmployeeCreate};

use super::employee::{EmployeeService, normalize_create};
use crate::audit::AuditAction;
use crate::auth::{CurrentUser, Operation, require};
use crate::db::repository::employee;
use crate::utils::validation::validate_employee_fields;
use crate::utils::{AppError, AppResult};

/// Header row written on export
pub const CSV_HEADER: [&str; 7] = [
    "ID",
    "Name",
    "Department",
    "Position",
    "Contact",
    "Job History",
    "Skills",
];

/// Result of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// File written with this many rows (header excluded)
    Written(usize),
    /// The directory is empty; no file was created
    NothingToExport,
}

impl EmployeeService {
    /// Insert every row of a CSV file (admin).
    ///
    /// The first row that fails validation or insertion aborts the rest;
    /// rows inserted before it stay.
    pub async fn import_csv(&self, user: &CurrentUser, path: impl AsRef<Path>) -> AppResult<usize> {
        let path = path.as_ref();
        match self.import_inner(user, path).await {
            Ok(count) => {
                self.audit.info(
                    AuditAction::EmployeesImported,
                    format!(
                        "Imported {count} employee(s) from {} by '{}'",
                        path.display(),
                        user.username
                    ),
                );
                Ok(count)
            }
            Err(e) => {
                self.audit.failure(
                    AuditAction::EmployeesImported,
                    format!("Import from {} by '{}'", path.display(), user.username),
                    &e,
                );
                Err(e)
            }
        }
    }

    async fn import_inner(&self, user: &CurrentUser, path: &Path) -> AppResult<usize> {
        require(user, Operation::ImportCsv)?;

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::file_not_found(path.display().to_string()));
            }
            Err(e) => {
                return Err(AppError::io(format!("Failed to read {}: {e}", path.display())));
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes.as_slice());

        let mut imported = 0;
        for (index, record) in reader.records().enumerate() {
            // 表头占第 1 行
            let line = index + 2;
            let record = record.map_err(|e| {
                AppError::csv(format!("Malformed CSV at line {line}: {e}")).with_detail("line", line)
            })?;
            if record.len() != CSV_HEADER.len() {
                return Err(AppError::csv(format!(
                    "Malformed CSV at line {line}: expected {} fields, found {}",
                    CSV_HEADER.len(),
                    record.len()
                ))
                .with_detail("line", line));
            }

            let data = normalize_create(record_to_create(&record));
            validate_employee_fields(
                &data.name,
                &data.department,
                &data.position,
                &data.contact,
                &data.job_history,
                &data.skills,
            )
            .map_err(|e| {
                let message = format!("Line {line}: {}", e.message);
                AppError { message, ..e }.with_detail("line", line)
            })?;

            employee::create(&self.pool, &data).await?;
            imported += 1;
        }

        tracing::debug!(path = %path.display(), imported, "CSV import finished");
        Ok(imported)
    }

    /// Write every employee to a CSV file, overwriting it (admin)
    pub async fn export_csv(
        &self,
        user: &CurrentUser,
        path: impl AsRef<Path>,
    ) -> AppResult<ExportOutcome> {
        let path = path.as_ref();
        match self.export_inner(user, path).await {
            Ok(outcome) => {
                let message = match outcome {
                    ExportOutcome::Written(count) => format!(
                        "Exported {count} employee(s) to {} by '{}'",
                        path.display(),
                        user.username
                    ),
                    ExportOutcome::NothingToExport => {
                        format!("Nothing to export for '{}'", user.username)
                    }
                };
                self.audit.info(AuditAction::EmployeesExported, message);
                Ok(outcome)
            }
            Err(e) => {
                self.audit.failure(
                    AuditAction::EmployeesExported,
                    format!("Export to {} by '{}'", path.display(), user.username),
                    &e,
                );
                Err(e)
            }
        }
    }

    async fn export_inner(&self, user: &CurrentUser, path: &Path) -> AppResult<ExportOutcome> {
        require(user, Operation::ExportCsv)?;

        let employees = employee::find_all(&self.pool).await?;
        if employees.is_empty() {
            return Ok(ExportOutcome::NothingToExport);
        }

        let bytes = encode_csv(&employees)?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| AppError::io(format!("Failed to write {}: {e}", path.display())))?;
        Ok(ExportOutcome::Written(employees.len()))
    }
}

fn record_to_create(record: &csv::StringRecord) -> EmployeeCreate {
    let text = |i: usize| record.get(i).unwrap_or_default().to_string();
    let optional = |i: usize| record.get(i).map(str::to_string);
    EmployeeCreate::new(
        text(1),
        text(2),
        text(3),
        optional(4),
        optional(5),
        optional(6),
    )
}

fn encode_csv(employees: &[Employee]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::csv(e.to_string()))?;
    for e in employees {
        let id = e.id.to_string();
        writer
            .write_record([
                id.as_str(),
                e.name.as_str(),
                e.department.as_str(),
                e.position.as_str(),
                e.contact.as_deref().unwrap_or_default(),
                e.job_history.as_deref().unwrap_or_default(),
                e.skills.as_deref().unwrap_or_default(),
            ])
            .map_err(|err| AppError::csv(err.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::csv(format!("Failed to flush CSV: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use crate::db::DbService;
    use shared::ErrorCode;
    use shared::models::Role;

    async fn setup() -> (EmployeeService, CurrentUser, tempfile::TempDir) {
        let db = DbService::in_memory().await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::open(dir.path().join("audit.log")).unwrap();
        (
            EmployeeService::new(db.pool.clone(), audit),
            CurrentUser::new(1, "admin", Role::Admin),
            dir,
        )
    }

    #[tokio::test]
    async fn test_export_empty_creates_no_file() {
        let (service, admin, dir) = setup().await;
        let path = dir.path().join("out.csv");
        let outcome = service.export_csv(&admin, &path).await.unwrap();
        assert_eq!(outcome, ExportOutcome::NothingToExport);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_export_writes_header_and_quotes() {
        let (service, admin, dir) = setup().await;
        service
            .add(
                &admin,
                EmployeeCreate::new(
                    "Ana",
                    "Eng",
                    "Dev",
                    Some("a@x.com".into()),
                    None,
                    Some("Go, Rust".into()),
                ),
            )
            .await
            .unwrap();
        let path = dir.path().join("out.csv");

        let outcome = service.export_csv(&admin, &path).await.unwrap();
        assert_eq!(outcome, ExportOutcome::Written(1));
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "ID,Name,Department,Position,Contact,Job History,Skills");
        assert_eq!(lines[1], "1,Ana,Eng,Dev,a@x.com,,\"Go, Rust\"");

        // 重复导出结果一致
        service.export_csv(&admin, &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let (service, admin, dir) = setup().await;
        let err = service
            .import_csv(&admin, dir.path().join("missing.csv"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }

    #[tokio::test]
    async fn test_import_ignores_id_column() {
        let (service, admin, dir) = setup().await;
        let path = dir.path().join("in.csv");
        std::fs::write(
            &path,
            "ID,Name,Department,Position,Contact,Job History,Skills\n\
             77,Ana,Eng,Dev,a@x.com,2yrs,Go\n\
             ,Bo,Ops,SRE,,,\n",
        )
        .unwrap();

        assert_eq!(service.import_csv(&admin, &path).await.unwrap(), 2);
        let all = service.list_all(&admin).await.unwrap();
        assert_eq!(all[0].id, 1);
        assert_eq!(all[0].skills.as_deref(), Some("Go"));
        assert_eq!(all[1].name, "Bo");
        assert_eq!(all[1].contact, None);
    }

    #[tokio::test]
    async fn test_import_aborts_at_first_bad_row() {
        let (service, admin, dir) = setup().await;
        let path = dir.path().join("in.csv");
        std::fs::write(
            &path,
            "ID,Name,Department,Position,Contact,Job History,Skills\n\
             1,Ana,Eng,Dev,,,\n\
             2,,Eng,Dev,,,\n\
             3,Cy,Eng,Dev,,,\n",
        )
        .unwrap();

        let err = service.import_csv(&admin, &path).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.starts_with("Line 3: "));
        assert_eq!(service.count(&admin).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_import_rejects_row_with_extra_fields() {
        let (service, admin, dir) = setup().await;
        let path = dir.path().join("in.csv");
        std::fs::write(
            &path,
            "ID,Name,Department,Position,Contact,Job History,Skills\n\
             1,Bo,Ops,SRE,,,\n\
             2,Ana,Eng,Dev,a@x.com,2yrs,Go,Rust,EXTRA\n",
        )
        .unwrap();

        let err = service.import_csv(&admin, &path).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CsvError);
        assert!(err.message.starts_with("Malformed CSV at line 3"));
        assert_eq!(service.count(&admin).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_import_rejects_short_header_and_rows() {
        let (service, admin, dir) = setup().await;
        let path = dir.path().join("in.csv");
        std::fs::write(&path, "ID,Name,Department,Position\n1,Ana,Eng,Dev\n").unwrap();

        let err = service.import_csv(&admin, &path).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CsvError);
        assert_eq!(
            err.message,
            "Malformed CSV at line 2: expected 7 fields, found 4"
        );
        assert_eq!(service.count(&admin).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_transfer() {
        let (service, _admin, dir) = setup().await;
        let bo = CurrentUser::new(2, "bo", Role::User);
        let path = dir.path().join("x.csv");
        assert!(service.import_csv(&bo, &path).await.unwrap_err().is_permission_denied());
        assert!(service.export_csv(&bo, &path).await.unwrap_err().is_permission_denied());
        assert!(!path.exists());
    }
}

//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Names, departments, positions
pub const MAX_NAME_LEN: usize = 200;

/// Contact details
pub const MAX_SHORT_TEXT_LEN: usize = 254;

/// Job history, skills
pub const MAX_NOTE_LEN: usize = 2000;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 64;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    let len = value.as_deref().map_or(0, |v| v.chars().count());
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate the six descriptive employee fields.
///
/// Name, department and position are required; the rest are optional.
pub fn validate_employee_fields(
    name: &str,
    department: &str,
    position: &str,
    contact: &Option<String>,
    job_history: &Option<String>,
    skills: &Option<String>,
) -> Result<(), AppError> {
    validate_required_text(name, "Name", MAX_NAME_LEN)?;
    validate_required_text(department, "Department", MAX_NAME_LEN)?;
    validate_required_text(position, "Position", MAX_NAME_LEN)?;
    validate_optional_text(contact, "Contact", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(job_history, "Job history", MAX_NOTE_LEN)?;
    validate_optional_text(skills, "Skills", MAX_NOTE_LEN)?;
    Ok(())
}

/// Parse a numeric identifier entered by the operator.
pub fn parse_id(input: &str) -> Result<i64, AppError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid_format(format!("'{}' is not a valid ID", input.trim())))
}

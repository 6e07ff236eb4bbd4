//! Parsing of free-form answers

use crate::utils::AppError;
use crate::utils::query_builder::EmployeeColumn;

/// Blank means "no column"; anything else must be on the allow-list
pub(super) fn parse_column(answer: &str) -> Result<Option<EmployeeColumn>, AppError> {
    if answer.is_empty() {
        return Ok(None);
    }
    answer
        .parse::<EmployeeColumn>()
        .map(Some)
        .map_err(|e| AppError::invalid_format(e.to_string()))
}

/// Blank means "use the default"
pub(super) fn parse_optional_number(answer: &str) -> Result<Option<i64>, AppError> {
    if answer.is_empty() {
        return Ok(None);
    }
    answer
        .parse::<i64>()
        .map(Some)
        .map_err(|_| AppError::invalid_format(format!("'{answer}' is not a valid number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_column("").unwrap(), None);
        assert_eq!(
            parse_column("Department").unwrap(),
            Some(EmployeeColumn::Department)
        );
        let err = parse_column("name; --").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_parse_optional_number() {
        assert_eq!(parse_optional_number("").unwrap(), None);
        assert_eq!(parse_optional_number("25").unwrap(), Some(25));
        assert!(parse_optional_number("ten").is_err());
    }
}

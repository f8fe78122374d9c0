//! Validation helpers
//!
//! Field validators used by the request DTOs and parsers for the numeric ids
//! that arrive as path segments or query parameters.

use validator::ValidationError;

use crate::utils::errors::AppError;

/// Rejects empty or whitespace-only strings
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

/// Parses a numeric identifier, naming the offending field on failure
pub fn parse_id(field: &str, value: &str) -> Result<i32, AppError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest(format!("{} must be an integer", field)))
}

/// Like [`parse_id`] but treats a missing or empty value as absent
pub fn parse_optional_id(field: &str, value: Option<&str>) -> Result<Option<i32>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_id(field, v).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Ivan").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", "42").unwrap(), 42);
        assert_eq!(parse_id("id", " 7 ").unwrap(), 7);

        let err = parse_id("route_id", "abc").unwrap_err();
        assert_eq!(err.to_string(), "Bad request: route_id must be an integer");
    }

    #[test]
    fn test_parse_optional_id() {
        assert_eq!(parse_optional_id("driver_id", None).unwrap(), None);
        assert_eq!(parse_optional_id("driver_id", Some("")).unwrap(), None);
        assert_eq!(parse_optional_id("driver_id", Some("3")).unwrap(), Some(3));
        assert!(parse_optional_id("driver_id", Some("x")).is_err());
    }
}

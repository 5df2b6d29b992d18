//! Validation Traits
//!
//! Request validation shared by the route handlers.

use crate::error::{ApiError, ApiResult};

/// Trait for validating non-empty strings.
///
/// # Example
/// ```ignore
/// use nowyouseeme_api::validation::ValidateNonEmpty;
///
/// fn create(agent_name: &Option<String>) -> ApiResult<()> {
///     agent_name.validate_non_empty("agent_name")?;
///     Ok(())
/// }
/// ```
pub trait ValidateNonEmpty {
    /// Returns `ApiError::missing_field` if the value is absent or empty.
    /// Whitespace counts as content.
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        if self.is_empty() {
            return Err(ApiError::missing_field(field_name));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        self.as_str().validate_non_empty(field_name)
    }
}

impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(ApiError::missing_field(field_name)),
        }
    }
}

/// Whole-request validation, run by handlers before touching the store.
pub trait Validate {
    fn validate(&self) -> ApiResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_validate_non_empty_str() {
        assert!("hello".validate_non_empty("test").is_ok());
        assert!("".validate_non_empty("test").is_err());
        assert!("   ".validate_non_empty("test").is_ok());
        assert!("\t\n".validate_non_empty("test").is_ok());
        assert!("  hi  ".validate_non_empty("test").is_ok());
    }

    #[test]
    fn test_validate_non_empty_option() {
        let some: Option<String> = Some("Echo".to_string());
        let blank: Option<String> = Some(" ".to_string());
        let empty: Option<String> = Some(String::new());
        let none: Option<String> = None;

        assert!(some.validate_non_empty("agent_name").is_ok());
        assert!(blank.validate_non_empty("agent_name").is_ok());
        assert!(empty.validate_non_empty("agent_name").is_err());
        assert!(none.validate_non_empty("agent_name").is_err());
    }

    #[test]
    fn test_error_names_the_field() {
        let err = match "".validate_non_empty("image_data") {
            Err(err) => err,
            Ok(()) => panic!("empty value accepted"),
        };
        assert_eq!(err.code, ErrorCode::MissingField);
        assert!(err.message.contains("image_data"));
    }
}

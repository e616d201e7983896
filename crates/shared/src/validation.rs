//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a community name.
const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of a community description.
const MAX_DESCRIPTION_LENGTH: usize = 2048;

/// Maximum length of a short code or join code.
const MAX_CODE_LENGTH: usize = 32;

/// Validates a community name: non-empty after trimming, bounded length.
pub fn validate_community_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("name_required");
        err.message = Some("Name is required".into());
        return Err(err);
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message = Some(format!("Name must not exceed {} characters", MAX_NAME_LENGTH).into());
        return Err(err);
    }
    Ok(())
}

/// Validates a community description length.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        let mut err = ValidationError::new("description_length");
        err.message = Some(
            format!(
                "Description must not exceed {} characters",
                MAX_DESCRIPTION_LENGTH
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Validates a short code or join code: lowercase alphanumeric plus
/// underscores and dashes, bounded length.
pub fn validate_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() || code.len() > MAX_CODE_LENGTH {
        let mut err = ValidationError::new("code_length");
        err.message =
            Some(format!("Code must be between 1 and {} characters", MAX_CODE_LENGTH).into());
        return Err(err);
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        let mut err = ValidationError::new("code_charset");
        err.message = Some("Code may only contain lowercase letters, digits, _ and -".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_name() {
        assert!(validate_community_name("Morning Prayer Circle").is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(validate_community_name("").is_err());
        assert!(validate_community_name("   ").is_err());
    }

    #[test]
    fn test_long_name_rejected() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_community_name(&name).is_err());
    }

    #[test]
    fn test_description_bounds() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"d".repeat(MAX_DESCRIPTION_LENGTH)).is_ok());
        assert!(validate_description(&"d".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_code_charset() {
        assert!(validate_code("stjohns42").is_ok());
        assert!(validate_code("st-johns_42").is_ok());
        assert!(validate_code("St.Johns").is_err());
        assert!(validate_code("has space").is_err());
    }

    #[test]
    fn test_code_length() {
        assert!(validate_code("").is_err());
        assert!(validate_code(&"x".repeat(MAX_CODE_LENGTH)).is_ok());
        assert!(validate_code(&"x".repeat(MAX_CODE_LENGTH + 1)).is_err());
    }
}

//! Validation utilities for registration input and configuration values
//!
//! All validators normalise their input on success so callers store the
//! cleaned value rather than what was typed at the front desk.

use regex::Regex;
use std::sync::LazyLock;

const MAX_NAME_LENGTH: usize = 100;
const MAX_CATEGORY_LENGTH: usize = 50;

/// Digits, spaces, dashes, dots and parentheses, optionally led by '+'
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ().-]+$").expect("phone pattern is valid"));

/// A rejected input value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error for a required field that was absent or blank
    pub fn missing(field: &str) -> Self {
        Self::new(format!("'{field}' is required"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

/// Validate a client display name
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::missing("name"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::new(format!(
            "'name' must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a contact phone number, returning it with formatting stripped
///
/// Accepts 7 to 15 digits (E.164 upper bound) with an optional leading '+'.
pub fn validate_contact(contact: &str) -> Result<String, ValidationError> {
    let trimmed = contact.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::missing("contact"));
    }
    if !PHONE_PATTERN.is_match(trimmed) {
        return Err(ValidationError::new(format!(
            "'{trimmed}' is not a valid phone number"
        )));
    }

    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if !(7..=15).contains(&digits.len()) {
        return Err(ValidationError::new(format!(
            "'{trimmed}' must contain between 7 and 15 digits"
        )));
    }

    if trimmed.starts_with('+') {
        Ok(format!("+{digits}"))
    } else {
        Ok(digits)
    }
}

/// Validate a category label, falling back to `default` when blank
pub fn validate_category(category: Option<&str>, default: &str) -> Result<String, ValidationError> {
    let trimmed = category.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Ok(default.to_string());
    }
    if trimmed.chars().count() > MAX_CATEGORY_LENGTH {
        return Err(ValidationError::new(format!(
            "'category' must be at most {MAX_CATEGORY_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a strictly positive configuration value
pub fn validate_positive(value: u64, field: &str) -> Result<u64, ValidationError> {
    if value == 0 {
        Err(ValidationError::new(format!(
            "'{field}' must be greater than 0"
        )))
    } else {
        Ok(value)
    }
}

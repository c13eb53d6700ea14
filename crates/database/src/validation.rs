//! Input validation for coordinates, free text and enumerated fields.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::models::{CapacitySize, RegularizationStatus};

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Number outside its permitted range (or not finite).
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Unknown store capacity size.
    InvalidCapacity(String),
    /// Unknown regularization status.
    InvalidStatus(String),
    /// Date not in `YYYY-MM-DD` form.
    InvalidDate(String),
    /// Month not in `YYYY-MM` form.
    InvalidMonth(String),
    /// Phone number with characters other than digits and separators.
    InvalidPhone(String),
    /// Username containing whitespace.
    InvalidUsername(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{} must be between {} and {} (got {})", field, min, max, value),
            ValidationError::InvalidCapacity(value) => write!(
                f,
                "Invalid capacity size '{}' (expected small, medium or large)",
                value
            ),
            ValidationError::InvalidStatus(value) => write!(f, "Invalid status '{}'", value),
            ValidationError::InvalidDate(value) => {
                write!(f, "Invalid date '{}' (expected YYYY-MM-DD)", value)
            }
            ValidationError::InvalidMonth(value) => {
                write!(f, "Invalid month '{}' (expected YYYY-MM)", value)
            }
            ValidationError::InvalidPhone(msg) => write!(f, "Invalid phone number: {}", msg),
            ValidationError::InvalidUsername(value) => {
                write!(f, "Invalid username '{}' (no spaces allowed)", value)
            }
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum length for usernames.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum length for names (people, stores, routes).
pub const MAX_NAME_LENGTH: usize = 128;

/// Maximum length for addresses and descriptions.
pub const MAX_ADDRESS_LENGTH: usize = 512;

/// Maximum length for phone numbers.
pub const MAX_PHONE_LENGTH: usize = 32;

/// Maximum length for photo references.
pub const MAX_PHOTO_LENGTH: usize = 512;

/// Maximum length for regularization reasons.
pub const MAX_REASON_LENGTH: usize = 1000;

/// Maximum length for notification titles.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for notification bodies.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(ValidationError::OutOfRange {
        field: field.to_string(),
        value,
        min,
        max,
    })
}

/// Validate a latitude in degrees.
pub fn validate_latitude(latitude: f64) -> Result<(), ValidationError> {
    check_range("latitude", latitude, -90.0, 90.0)
}

/// Validate a longitude in degrees.
pub fn validate_longitude(longitude: f64) -> Result<(), ValidationError> {
    check_range("longitude", longitude, -180.0, 180.0)
}

/// Validate a latitude/longitude pair.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    validate_latitude(latitude)?;
    validate_longitude(longitude)
}

/// Validate a required text field: non-blank and at most `max` characters.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    validate_length(field, value, max)
}

/// Validate an optional text field: at most `max` characters once trimmed.
pub fn validate_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.trim().chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }

    Ok(())
}

/// Validate a login name: required, bounded, and free of whitespace.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    validate_text("username", username, MAX_USERNAME_LENGTH)?;

    if username.trim().contains(char::is_whitespace) {
        return Err(ValidationError::InvalidUsername(username.to_string()));
    }

    Ok(())
}

/// Validate a phone number.
///
/// Accepts digits plus `+`, spaces, dashes and parentheses, with at least
/// six digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    validate_text("phone number", phone, MAX_PHONE_LENGTH)?;

    if let Some(c) = phone
        .trim()
        .chars()
        .find(|c| !(c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')')))
    {
        return Err(ValidationError::InvalidPhone(format!(
            "invalid character '{}'",
            c
        )));
    }

    if phone.chars().filter(|c| c.is_ascii_digit()).count() < 6 {
        return Err(ValidationError::InvalidPhone(
            "must contain at least six digits".to_string(),
        ));
    }

    Ok(())
}

/// Parse a store capacity size.
pub fn parse_capacity_size(value: &str) -> Result<CapacitySize, ValidationError> {
    match value.trim().to_lowercase().as_str() {
        "small" => Ok(CapacitySize::Small),
        "medium" => Ok(CapacitySize::Medium),
        "large" => Ok(CapacitySize::Large),
        _ => Err(ValidationError::InvalidCapacity(value.to_string())),
    }
}

/// Parse a regularization status.
pub fn parse_status(value: &str) -> Result<RegularizationStatus, ValidationError> {
    match value.trim().to_lowercase().as_str() {
        "pending" => Ok(RegularizationStatus::Pending),
        "approved" => Ok(RegularizationStatus::Approved),
        "rejected" => Ok(RegularizationStatus::Rejected),
        _ => Err(ValidationError::InvalidStatus(value.to_string())),
    }
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Parse a calendar month in `YYYY-MM` form.
///
/// Returns the half-open range `[first day, first day of next month)`.
pub fn parse_month(value: &str) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let invalid = || ValidationError::InvalidMonth(value.to_string());

    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;

    Ok((start, end))
}

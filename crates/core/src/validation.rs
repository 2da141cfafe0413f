//! Input validation utilities.
//!
//! Forms arrive as loosely typed strings (from JSON bodies or CLI flags). These helpers turn
//! individual fields into typed values and report failures as `HospitalError::InvalidInput`
//! or `HospitalError::InvalidText` naming the offending field.

use crate::{HospitalError, HospitalResult};
use chrono::NaiveDate;
use hpms_types::NonEmptyText;

/// Date format accepted by every date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A required free-text field.
pub fn required(field: &'static str, value: &str) -> HospitalResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(HospitalError::field(field))
}

/// An optional free-text field. Blank input means "not provided".
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// A required `YYYY-MM-DD` date.
pub fn required_date(field: &'static str, value: &str) -> HospitalResult<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HospitalError::InvalidInput(format!("{field} is required")));
    }
    parse_date(field, trimmed)
}

/// An optional `YYYY-MM-DD` date. Blank input means "not provided".
pub fn optional_date(field: &'static str, value: Option<&str>) -> HospitalResult<Option<NaiveDate>> {
    optional(value)
        .map(|v| parse_date(field, &v))
        .transpose()
}

fn parse_date(field: &'static str, value: &str) -> HospitalResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        HospitalError::InvalidInput(format!("{field} must be a date in YYYY-MM-DD form"))
    })
}

/// An optional integer field.
pub fn optional_integer(field: &'static str, value: Option<&str>) -> HospitalResult<Option<i32>> {
    optional(value)
        .map(|v| {
            v.parse::<i32>().map_err(|_| {
                HospitalError::InvalidInput(format!("{field} must be a whole number"))
            })
        })
        .transpose()
}

/// A monetary amount: a plain decimal, not negative, with at most two decimal places.
pub fn amount(field: &'static str, value: &str) -> HospitalResult<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HospitalError::InvalidInput(format!("{field} is required")));
    }

    let parsed = trimmed
        .parse::<f64>()
        .map_err(|_| HospitalError::InvalidInput(format!("{field} must be a number")))?;

    if !parsed.is_finite() {
        return Err(HospitalError::InvalidInput(format!(
            "{field} must be a finite number"
        )));
    }
    if parsed < 0.0 {
        return Err(HospitalError::InvalidInput(format!(
            "{field} cannot be negative"
        )));
    }

    let (whole, cents) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && cents.is_empty()) || !digits(whole) || !digits(cents) {
        return Err(HospitalError::InvalidInput(format!(
            "{field} must be a plain decimal number"
        )));
    }
    if cents.len() > 2 {
        return Err(HospitalError::InvalidInput(format!(
            "{field} cannot have fractions of a cent"
        )));
    }

    Ok(parsed)
}

/// Round a monetary value to whole cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

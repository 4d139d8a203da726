use crate::error::{AppError, AppResult};
use regex::Regex;

/// Validate an email address shape.
pub fn validate_email(email: &str) -> AppResult<()> {
    let email_regex = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();

    if !email_regex.is_match(email) {
        return Err(AppError::ValidationError(format!(
            "Invalid email address: {email}"
        )));
    }

    Ok(())
}

/// Validate a non-negative, finite money amount.
pub fn validate_price(value: f64, field: &str) -> AppResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::ValidationError(format!(
            "{field} must be a non-negative amount"
        )));
    }

    Ok(())
}

/// Validate a session duration in minutes (15 minutes to 8 hours).
pub fn validate_duration_minutes(value: i32, field: &str) -> AppResult<()> {
    if !(15..=480).contains(&value) {
        return Err(AppError::ValidationError(format!(
            "{field} must be between 15 and 480 minutes"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("anna@studio.example").is_ok());
        assert!(validate_email("first.last+tag@mail.example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0, "price_per_hour").is_ok());
        assert!(validate_price(85.5, "price_per_hour").is_ok());
        assert!(validate_price(-1.0, "price_per_hour").is_err());
        assert!(validate_price(f64::NAN, "price_per_hour").is_err());
        assert!(validate_price(f64::INFINITY, "price_per_hour").is_err());
    }

    #[test]
    fn test_validate_duration_minutes() {
        assert!(validate_duration_minutes(15, "duration").is_ok());
        assert!(validate_duration_minutes(60, "duration").is_ok());
        assert!(validate_duration_minutes(480, "duration").is_ok());
        assert!(validate_duration_minutes(10, "duration").is_err());
        assert!(validate_duration_minutes(481, "duration").is_err());
    }
}

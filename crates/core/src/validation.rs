//! Validation helpers for request payloads
//!
//! Validation errors are raised before any persistence work so callers
//! get a specific reason rather than a generic failure.

use crate::error::{CinelogError, Result};

/// Earliest year a movie can carry (the first film, 1888).
pub const MIN_MOVIE_YEAR: i16 = 1888;

/// Validate a rating score is an integer in [1, 10].
pub fn validate_rating(score: i16) -> Result<()> {
    if !(1..=10).contains(&score) {
        return Err(CinelogError::Validation(
            "Rating must be between 1 and 10".to_string(),
        ));
    }
    Ok(())
}

/// Validate a movie year.
pub fn validate_year(year: i16) -> Result<()> {
    if year < MIN_MOVIE_YEAR {
        return Err(CinelogError::Validation(format!(
            "Year must be {} or later",
            MIN_MOVIE_YEAR
        )));
    }
    Ok(())
}

/// Validate an ISO-3166-1 alpha-2 country code. Empty is allowed; the
/// field is optional on profiles.
pub fn validate_country_code(code: &str) -> Result<()> {
    if code.is_empty() {
        return Ok(());
    }
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_uppercase()) {
        return Ok(());
    }
    Err(CinelogError::Validation(
        "Country must be an ISO-3166-1 alpha-2 code".to_string(),
    ))
}

/// Validate password complexity: at least 8 characters, one digit and
/// one non-alphanumeric character.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(CinelogError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(CinelogError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        return Err(CinelogError::Validation(
            "Password must contain at least one special character".to_string(),
        ));
    }
    Ok(())
}

/// Minimal structural email check: one `@` with a dot in the domain.
pub fn validate_email(email: &str) -> Result<()> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err(CinelogError::Validation(
            "Invalid email address".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(10).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(11).is_err());
        assert!(validate_rating(-3).is_err());
    }

    #[test]
    fn test_year_floor() {
        assert!(validate_year(1888).is_ok());
        assert!(validate_year(2024).is_ok());
        assert!(validate_year(1887).is_err());
    }

    #[test]
    fn test_country_codes() {
        assert!(validate_country_code("").is_ok());
        assert!(validate_country_code("US").is_ok());
        assert!(validate_country_code("TR").is_ok());
        assert!(validate_country_code("usa").is_err());
        assert!(validate_country_code("us").is_err());
        assert!(validate_country_code("U1").is_err());
    }

    #[test]
    fn test_password_complexity() {
        assert!(validate_password("Secure1!").is_ok());
        assert!(validate_password("short1!").is_err());
        assert!(validate_password("NoDigits!!").is_err());
        assert!(validate_password("NoSpecial123").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@example.").is_err());
        assert!(validate_email("plainaddress").is_err());
    }
}

//! Input validation for registration and login.

use crate::error::{CoreError, Result};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate email address format.
///
/// This performs basic RFC 5322 validation:
/// - Must contain exactly one `@`
/// - Must have non-empty local and domain parts
/// - Domain must contain at least one dot
/// - Length must be between 3 and 255 characters
///
/// # Examples
///
/// ```
/// use cinebook_core::validate::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(is_valid_email("user+tag@subdomain.example.com"));
/// assert!(!is_valid_email("invalid"));
/// assert!(!is_valid_email("@example.com"));
/// assert!(!is_valid_email("user@"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    // Must contain exactly one @
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    let valid_local_chars =
        |c: char| c.is_alphanumeric() || c == '.' || c == '-' || c == '+' || c == '_';
    let valid_domain_chars = |c: char| c.is_alphanumeric() || c == '.' || c == '-';

    if !local.chars().all(valid_local_chars) {
        return false;
    }
    if !domain.chars().all(valid_domain_chars) {
        return false;
    }

    // Domain parts between dots must be non-empty
    domain.split('.').all(|part| !part.is_empty())
}

/// Validates a registration username: 3 to 100 characters, no whitespace.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] describing the first failed rule.
pub fn validate_username(username: &str) -> Result<()> {
    if username.len() < 3 || username.len() > 100 {
        return Err(CoreError::Validation(
            "username must be between 3 and 100 characters".to_string(),
        ));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(
            "username must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Validates a registration email address.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] when the format is invalid.
pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "invalid email address".to_string(),
        ))
    }
}

/// Validates a registration password.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] when the password is too short.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name@example.com"));
        assert!(is_valid_email("user+tag@example.com"));
        assert!(is_valid_email("user_name@subdomain.example.com"));
        assert!(is_valid_email("user-name@example.co.uk"));
    }

    #[test]
    fn invalid_emails() {
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b")); // No dot in domain
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("moviefan").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(101)).is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
    }
}

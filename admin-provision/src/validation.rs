use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ProvisionError, Result};

/// Shortest password the CRM login endpoint accepts
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_EMAIL_LENGTH: usize = 255;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email pattern is valid")
    })
}

/// Validate email format (RFC 5322 compliant)
pub fn validate_email(email: &str) -> Result<()> {
    if !email_regex().is_match(email) {
        return Err(ProvisionError::InvalidInput(format!(
            "invalid email format: {}",
            email
        )));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ProvisionError::InvalidInput(format!(
            "email is too long (max {} characters)",
            MAX_EMAIL_LENGTH
        )));
    }

    Ok(())
}

/// Validate that the password is usable at the login form
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ProvisionError::InvalidInput(format!(
            "password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    // bcrypt ignores everything past 72 bytes
    if password.len() > 72 {
        return Err(ProvisionError::InvalidInput(
            "password is too long (max 72 bytes)".to_string(),
        ));
    }

    Ok(())
}

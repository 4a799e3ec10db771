//! Input cleanup and login-form validation.
//!
//! These checks run on the caller side, before anything reaches the network.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::{MAX_EMAIL_CHARS, MAX_INPUT_CHARS, MAX_PASSWORD_CHARS, MIN_PASSWORD_CHARS};
use crate::error::ValidationError;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Trim surrounding whitespace and cap the input at 2000 characters.
pub fn sanitize_input(input: &str) -> String {
    input.trim().chars().take(MAX_INPUT_CHARS).collect()
}

pub fn validate_email(email: &str) -> bool {
    email_regex().is_match(email) && email.chars().count() <= MAX_EMAIL_CHARS
}

pub fn validate_password(password: &str) -> bool {
    let len = password.chars().count();
    (MIN_PASSWORD_CHARS..=MAX_PASSWORD_CHARS).contains(&len)
}

/// Credentials that passed validation, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sanitize and validate raw login form input.
pub fn validate_credentials(email: &str, password: &str) -> Result<Credentials, ValidationError> {
    let email = sanitize_input(email);
    let password = sanitize_input(password);

    if !validate_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !validate_password(&password) {
        return Err(ValidationError::InvalidPassword);
    }

    Ok(Credentials { email, password })
}

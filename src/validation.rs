use regex::Regex;
use std::sync::OnceLock;

use crate::error::AppError;
use crate::Result;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,7}\b$")
            .expect("email pattern is valid")
    })
}

/// Whole-string match against the accepted email grammar.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Unwraps a field that only has to be sent; an empty string is accepted.
pub fn present(value: Option<String>, message: &str) -> Result<String> {
    value.ok_or_else(|| AppError::ValidationError(message.to_string()))
}

/// Unwraps a required text field. Absent and empty values are both missing.
pub fn required(value: Option<String>, message: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::ValidationError(message.to_string())),
    }
}

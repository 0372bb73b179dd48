use core::result::Result;
use validator::ValidationError;

/// Requires at least one ASCII letter and one digit.
pub fn password(value: &str) -> Result<(), ValidationError> {
    let has_letter = value.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());

    match has_letter && has_digit {
        true => Ok(()),
        false => Err(ValidationError::new("password_strength")),
    }
}

use core::result::Result;
use validator::ValidationError;

/// Digits only, between 9 and 20 of them.
pub fn phone(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone"));
    }
    if value.len() < 9 || value.len() > 20 {
        return Err(ValidationError::new("phone_length"));
    }
    Ok(())
}

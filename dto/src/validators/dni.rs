use core::result::Result;
use validator::ValidationError;

/// National id: 7 or 8 digits.
pub fn dni(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("dni"));
    }
    match value.len() {
        7 | 8 => Ok(()),
        _ => Err(ValidationError::new("dni_length")),
    }
}

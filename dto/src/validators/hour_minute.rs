use chrono::NaiveTime;
use core::result::Result;
use validator::ValidationError;

/// `HH:mm` time of day.
pub fn hour_minute(value: &str) -> Result<(), ValidationError> {
    match NaiveTime::parse_from_str(value, "%H:%M") {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("hour_minute")),
    }
}

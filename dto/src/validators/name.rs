use core::result::Result;
use validator::ValidationError;

/// Person and pet names: letters (accents, ñ and ü included), spaces and hyphens.
pub fn name(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new("name"));
    }

    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || "áéíóúÁÉÍÓÚñÑüÜ".contains(c));

    match valid {
        true => Ok(()),
        false => Err(ValidationError::new("name")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid() {
        assert!(name("Juan").is_ok());
        assert!(name("María José").is_ok());
        assert!(name("Peña-Güemes").is_ok());
        assert!(name("  Ana ").is_ok());
    }

    #[test]
    fn test_invalid() {
        assert!(name("").is_err());
        assert!(name("   ").is_err());
        assert!(name("R2D2").is_err());
        assert!(name("juan@mail").is_err());
        assert!(name("Zoë").is_err());
    }
}

/// Lowercases, trims, collapses whitespace and capitalizes every word.
pub fn capitalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Capitalizes a name and surname pair.
pub fn capitalize_proper_names(name: &str, surname: &str) -> (String, String) {
    (capitalize_name(name), capitalize_name(surname))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize_name("juan  pérez"), "Juan Pérez");
        assert_eq!(capitalize_name("  MARÍA josé "), "María José");
        assert_eq!(capitalize_name("ñandú"), "Ñandú");
        assert_eq!(capitalize_name(""), "");
    }

    #[test]
    fn test_proper_names() {
        let (name, surname) = capitalize_proper_names("ANA", "gómez-peña");
        assert_eq!(name, "Ana");
        assert_eq!(surname, "Gómez-peña");
    }
}

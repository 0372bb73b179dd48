use validator::ValidationErrors;

/// Collapses validation errors into a single `field: code` list.
pub fn flatten_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
            format!("{}: {}", field, codes.join(", "))
        })
        .collect();

    // HashMap order is unstable
    fields.sort();
    fields.join("; ")
}

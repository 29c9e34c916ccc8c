/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// True if the value is missing, empty, or only whitespace.
pub fn is_blank<S: AsRef<str>>(value: Option<S>) -> bool {
    value.map(|s| s.as_ref().trim().is_empty()).unwrap_or(true)
}

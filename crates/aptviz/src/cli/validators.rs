//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Validate a package name given on the command line.
///
/// Names are passed verbatim to the installer, so anything that would split
/// into several arguments or be mistaken for an option is rejected. An
/// architecture qualifier (`foo:i386`) is allowed.
pub fn validate_package_name(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Package name cannot be empty".to_string());
    }

    if s.starts_with('-') {
        return Err(format!("Invalid package name '{s}': cannot start with '-'"));
    }

    if let Some(c) = s
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, ',' | '|' | '(' | ')'))
    {
        return Err(format!("Invalid package name '{s}': bad character {c:?}"));
    }

    Ok(s.to_string())
}

//! Code format helpers.

/// Generate a login code of the form `NNN-NNN` (each group 100..=999).
pub fn generate_code() -> String {
    let first: u16 = rand::random_range(100..=999);
    let second: u16 = rand::random_range(100..=999);
    format!("{first}-{second}")
}

/// Strip whitespace and dashes so `123 456` and `123-456` compare equal.
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Compare a submitted code against the stored one.
pub fn codes_match(submitted: &str, stored: &str) -> bool {
    let submitted = normalize_code(submitted);
    !submitted.is_empty() && submitted == normalize_code(stored)
}

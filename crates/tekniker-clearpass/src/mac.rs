//! MAC address validation.

use tekniker_core::error::AppError;
use tekniker_core::messages;
use tekniker_core::result::AppResult;

/// Validate a MAC address and return it trimmed.
///
/// Accepts 12 hex digits, optionally grouped with `:`, `-` or `.`
/// (`aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff`, `aabb.ccdd.eeff`,
/// `aabbccddeeff`). The address is forwarded to ClearPass as written.
pub fn validate_mac(raw: &str) -> AppResult<String> {
    let mac = raw.trim();
    if mac.is_empty() {
        return Err(AppError::validation(messages::MAC_REQUIRED));
    }

    let mut digits = 0usize;
    for c in mac.chars() {
        match c {
            ':' | '-' | '.' => {}
            c if c.is_ascii_hexdigit() => digits += 1,
            _ => return Err(AppError::validation(messages::MAC_INVALID)),
        }
    }

    if digits != 12 {
        return Err(AppError::validation(messages::MAC_INVALID));
    }

    Ok(mac.to_string())
}

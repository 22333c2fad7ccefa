//! Cache key builders for all CP-Tekniker cache entries.
//!
//! The Redis provider adds its configured prefix on top of these.

/// Cache key for the pending one-time code of an email address.
pub fn auth_code(email: &str) -> String {
    format!("auth_code:{}", email.trim().to_lowercase())
}

/// Cache key for a server-side session.
pub fn session(token: &str) -> String {
    format!("session:{token}")
}

/// Cache key for one fixed rate-limit window of a client on an endpoint.
pub fn rate_limit(endpoint: &str, client: &str, window_seconds: u64, window_index: u64) -> String {
    format!("rate:{endpoint}:{client}:{window_seconds}:{window_index}")
}

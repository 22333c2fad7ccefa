//! Session configuration.

use serde::{Deserialize, Serialize};

/// Server-side session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime in hours.
    #[serde(default = "default_lifetime")]
    pub lifetime_hours: u64,
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Set the `Secure` attribute on the session cookie.
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime_hours: default_lifetime(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    /// Session lifetime in seconds.
    pub fn lifetime_seconds(&self) -> u64 {
        self.lifetime_hours * 60 * 60
    }
}

fn default_lifetime() -> u64 {
    8
}

fn default_cookie_name() -> String {
    "session".to_string()
}

//! One-time code login configuration.

use serde::{Deserialize, Serialize};

/// One-time code, allow-list and rate limit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// How long an emailed code stays valid, in seconds.
    #[serde(default = "default_code_ttl")]
    pub code_ttl_seconds: u64,
    /// Path to the JSON allow-list of approved emails and domains.
    #[serde(default = "default_allowlist_path")]
    pub allowlist_path: String,
    /// Per-endpoint request limits.
    #[serde(default)]
    pub rate_limits: RateLimitConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: default_code_ttl(),
            allowlist_path: default_allowlist_path(),
            rate_limits: RateLimitConfig::default(),
        }
    }
}

/// Request limits for the unauthenticated login endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Limits for `POST /request_auth_code`.
    #[serde(default = "default_request_code_rules")]
    pub request_code: Vec<RateLimitRule>,
    /// Limits for `POST /login`.
    #[serde(default = "default_login_rules")]
    pub login: Vec<RateLimitRule>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            request_code: default_request_code_rules(),
            login: default_login_rules(),
        }
    }
}

/// At most `limit` requests per client in each fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRule {
    /// Maximum requests allowed in one window.
    pub limit: u32,
    /// Window length in seconds.
    pub window_seconds: u64,
}

impl RateLimitRule {
    /// Create a rule allowing `limit` requests per `window_seconds`.
    pub const fn new(limit: u32, window_seconds: u64) -> Self {
        Self {
            limit,
            window_seconds,
        }
    }
}

fn default_code_ttl() -> u64 {
    600
}

fn default_allowlist_path() -> String {
    "approved_domains.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_code_rules() -> Vec<RateLimitRule> {
    vec![RateLimitRule::new(5, 60), RateLimitRule::new(20, 3600)]
}

fn default_login_rules() -> Vec<RateLimitRule> {
    vec![RateLimitRule::new(10, 60), RateLimitRule::new(30, 3600)]
}

//! ClearPass API client configuration.

use serde::{Deserialize, Serialize};

/// Connection and OAuth2 client-credentials settings for the ClearPass API.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClearPassConfig {
    /// Base URL of the ClearPass server, e.g. `https://clearpass.example.net`.
    #[serde(default)]
    pub base_url: String,
    /// OAuth2 client ID.
    #[serde(default)]
    pub client_id: String,
    /// OAuth2 client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Name of the role mapping policy whose rules list the guest roles.
    #[serde(default = "default_role_mapping_name")]
    pub role_mapping_name: String,
    /// Timeout for each outbound request in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Refresh the access token this many seconds before it expires.
    #[serde(default = "default_refresh_margin")]
    pub token_refresh_margin_seconds: u64,
    /// Token lifetime assumed when the OAuth response has no `expires_in`.
    #[serde(default = "default_token_ttl")]
    pub default_token_ttl_seconds: u64,
}

impl Default for ClearPassConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            role_mapping_name: default_role_mapping_name(),
            request_timeout_seconds: default_request_timeout(),
            token_refresh_margin_seconds: default_refresh_margin(),
            default_token_ttl_seconds: default_token_ttl(),
        }
    }
}

impl std::fmt::Debug for ClearPassConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClearPassConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"****")
            .field("role_mapping_name", &self.role_mapping_name)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field(
                "token_refresh_margin_seconds",
                &self.token_refresh_margin_seconds,
            )
            .field("default_token_ttl_seconds", &self.default_token_ttl_seconds)
            .finish()
    }
}

fn default_role_mapping_name() -> String {
    "[Guest Roles]".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_refresh_margin() -> u64 {
    30
}

fn default_token_ttl() -> u64 {
    3600
}

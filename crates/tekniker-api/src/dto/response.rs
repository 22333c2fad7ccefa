//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Plain message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// User-facing message.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// User-facing message.
    pub message: String,
    /// Token for `Authorization: Bearer` clients.
    pub session_token: String,
}

/// `GET /is_logged_in` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginStatusResponse {
    /// Whether the caller has a live session.
    pub logged_in: bool,
    /// Email of the logged-in technician; empty when logged out.
    #[serde(default)]
    pub email: String,
}

/// `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// `connected` or `unavailable`.
    pub cache: String,
}

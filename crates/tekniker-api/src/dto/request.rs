//! Request DTOs.

use serde::{Deserialize, Serialize};

/// `POST /request_auth_code` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestCodeRequest {
    /// Address to send the code to.
    #[serde(default)]
    pub email: String,
}

/// `POST /login` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Address the code was sent to.
    #[serde(default)]
    pub email: String,
    /// The emailed code, `NNN-NNN`.
    #[serde(default)]
    pub code: String,
}

/// `GET /get_device_info` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceQuery {
    /// MAC address to look up.
    #[serde(default)]
    pub macaddr: Option<String>,
}

//! Outgoing mail configuration.

use serde::{Deserialize, Serialize};

/// SMTP relay settings used to deliver one-time codes.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host.
    #[serde(default)]
    pub server: String,
    /// SMTP relay port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Envelope and header sender address.
    #[serde(default)]
    pub from: String,
    /// Display name for the sender.
    #[serde(default)]
    pub from_name: String,
    /// Optional SMTP AUTH username.
    #[serde(default)]
    pub username: Option<String>,
    /// Optional SMTP AUTH password.
    #[serde(default)]
    pub password: Option<String>,
    /// Connection timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// `List-Unsubscribe` header value; empty omits the header.
    #[serde(default = "default_list_unsubscribe")]
    pub list_unsubscribe: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: default_port(),
            from: String::new(),
            from_name: String::new(),
            username: None,
            password: None,
            timeout_seconds: default_timeout(),
            list_unsubscribe: default_list_unsubscribe(),
        }
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("from", &self.from)
            .field("from_name", &self.from_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("list_unsubscribe", &self.list_unsubscribe)
            .finish()
    }
}

fn default_port() -> u16 {
    25
}

fn default_timeout() -> u64 {
    10
}

fn default_list_unsubscribe() -> String {
    "<mailto:unsubscribe@ngdata.no?subject=unsubscribe-clearpass>".to_string()
}

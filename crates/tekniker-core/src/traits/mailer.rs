//! Mail delivery trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Delivers one-time login codes to users.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Send `code` to `recipient`, stating that it is valid for `valid_minutes`.
    async fn send_auth_code(&self, recipient: &str, code: &str, valid_minutes: u64)
    -> AppResult<()>;
}

//! Issues and verifies one-time login codes.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use tekniker_cache::{CacheManager, keys};
use tekniker_core::error::AppError;
use tekniker_core::messages;
use tekniker_core::result::AppResult;
use tekniker_core::traits::cache::CacheProvider;
use tekniker_core::traits::mailer::Mailer;

use crate::allowlist::AllowListLoader;

use super::code::{codes_match, generate_code};

/// One-time code issuer and verifier.
#[derive(Clone)]
pub struct OtpService {
    /// Code storage.
    cache: Arc<CacheManager>,
    /// Code delivery.
    mailer: Arc<dyn Mailer>,
    /// Approved emails and domains.
    allowlist: AllowListLoader,
    /// Lifetime of an issued code.
    code_ttl: Duration,
}

impl std::fmt::Debug for OtpService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpService")
            .field("allowlist", &self.allowlist)
            .field("code_ttl", &self.code_ttl)
            .finish()
    }
}

impl OtpService {
    /// Create a new OTP service.
    pub fn new(
        cache: Arc<CacheManager>,
        mailer: Arc<dyn Mailer>,
        allowlist: AllowListLoader,
        code_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            mailer,
            allowlist,
            code_ttl,
        }
    }

    /// Issue a code for `email` and mail it.
    ///
    /// 1. Reject an empty address
    /// 2. Reject addresses not covered by the allow-list
    /// 3. Store a fresh code, replacing any pending one
    /// 4. Mail it; on failure the stored code is dropped again
    pub async fn request_code(&self, email: &str) -> AppResult<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::validation(messages::EMAIL_REQUIRED));
        }

        let allowlist = self.allowlist.load().await?;
        if !allowlist.is_approved(email) {
            warn!("Login code requested for unapproved address");
            return Err(AppError::authorization(messages::EMAIL_NOT_APPROVED));
        }

        let key = keys::auth_code(email);
        let code = generate_code();
        self.cache.set(&key, &code, self.code_ttl).await?;

        let valid_minutes = (self.code_ttl.as_secs() / 60).max(1);
        if let Err(e) = self
            .mailer
            .send_auth_code(email, &code, valid_minutes)
            .await
        {
            error!(error = %e, "Failed to deliver login code");
            if let Err(e) = self.cache.delete(&key).await {
                warn!(error = %e, "Failed to drop undelivered login code");
            }
            return Err(AppError::mail(messages::CODE_SEND_FAILED));
        }

        info!(email, "Login code issued");
        Ok(())
    }

    /// Verify a submitted code and consume it on success.
    ///
    /// Returns the normalized (trimmed, lowercase) email the session should
    /// be opened for.
    pub async fn verify_code(&self, email: &str, code: &str) -> AppResult<String> {
        let email = email.trim();
        let code = code.trim();
        if email.is_empty() || code.is_empty() {
            return Err(AppError::validation(messages::EMAIL_AND_CODE_REQUIRED));
        }

        let key = keys::auth_code(email);
        let Some(stored) = self.cache.get(&key).await? else {
            return Err(AppError::validation(messages::NO_CODE_REQUESTED));
        };

        if !codes_match(code, &stored) {
            warn!(email, "Invalid login code submitted");
            return Err(AppError::authentication(messages::INVALID_CODE));
        }

        // Only the caller that removes this exact code wins; a code issued
        // since the read stays in place.
        if !self.cache.delete_if_eq(&key, &stored).await? {
            return Err(AppError::validation(messages::NO_CODE_REQUESTED));
        }

        info!(email, "Login code accepted");
        Ok(email.to_lowercase())
    }
}

//! Session records kept in the TTL cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tekniker_cache::{CacheManager, keys};
use tekniker_core::config::session::SessionConfig;
use tekniker_core::result::AppResult;
use tekniker_core::traits::cache::CacheProvider;

use super::token::generate_session_token;

/// A logged-in technician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Always `true` for a stored session.
    pub logged_in: bool,
    /// Normalized email the session belongs to.
    pub user_email: String,
    /// Opaque token identifying the session.
    pub session_token: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is past its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Creates, resolves and destroys sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Session storage.
    cache: Arc<CacheManager>,
    /// Session lifetime.
    lifetime: Duration,
}

impl SessionStore {
    /// Create a session store.
    pub fn new(cache: Arc<CacheManager>, config: &SessionConfig) -> Self {
        Self {
            cache,
            lifetime: Duration::from_secs(config.lifetime_seconds()),
        }
    }

    /// Create a session store with an explicit lifetime.
    pub fn with_lifetime(cache: Arc<CacheManager>, lifetime: Duration) -> Self {
        Self { cache, lifetime }
    }

    /// Session lifetime.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Open a new session for `email`.
    pub async fn create(&self, email: &str) -> AppResult<Session> {
        let now = Utc::now();
        let lifetime = chrono::Duration::from_std(self.lifetime).unwrap_or(chrono::Duration::hours(8));

        let session = Session {
            logged_in: true,
            user_email: email.to_string(),
            session_token: generate_session_token(),
            created_at: now,
            expires_at: now + lifetime,
        };

        self.cache
            .set_json(&keys::session(&session.session_token), &session, self.lifetime)
            .await?;

        info!(email, "Session created");
        Ok(session)
    }

    /// Resolve a token to a live session.
    pub async fn find(&self, token: &str) -> AppResult<Option<Session>> {
        if token.is_empty() {
            return Ok(None);
        }

        let key = keys::session(token);
        let session: Option<Session> = match self.cache.get_json(&key).await {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session record");
                self.cache.delete(&key).await?;
                return Ok(None);
            }
        };

        match session {
            Some(s) if s.logged_in && !s.is_expired() && s.session_token == token => Ok(Some(s)),
            Some(_) => {
                debug!("Session expired or inconsistent");
                self.cache.delete(&key).await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Destroy a session. Unknown tokens are ignored.
    pub async fn destroy(&self, token: &str) -> AppResult<()> {
        if token.is_empty() {
            return Ok(());
        }
        self.cache.delete(&keys::session(token)).await?;
        debug!("Session destroyed");
        Ok(())
    }
}

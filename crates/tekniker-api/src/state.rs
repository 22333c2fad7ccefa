//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use tekniker_auth::allowlist::AllowListLoader;
use tekniker_auth::otp::OtpService;
use tekniker_auth::session::SessionStore;
use tekniker_cache::CacheManager;
use tekniker_clearpass::ClearPassClient;
use tekniker_core::config::AppConfig;
use tekniker_core::traits::mailer::Mailer;

use crate::middleware::rate_limit::RateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Cache manager (Redis or in-memory)
    pub cache: Arc<CacheManager>,
    /// ClearPass API client
    pub clearpass: Arc<ClearPassClient>,

    // ── Auth ─────────────────────────────────────────────────
    /// One-time code issuer and verifier
    pub otp: Arc<OtpService>,
    /// Server-side sessions
    pub sessions: Arc<SessionStore>,
    /// Approved emails/domains file
    pub allowlist: AllowListLoader,
    /// Fixed-window limiter for the login endpoints
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Wire the state from its collaborators.
    pub fn new(
        config: AppConfig,
        cache: Arc<CacheManager>,
        mailer: Arc<dyn Mailer>,
        clearpass: ClearPassClient,
    ) -> Self {
        let allowlist = AllowListLoader::new(&config.auth.allowlist_path);

        let otp = Arc::new(OtpService::new(
            Arc::clone(&cache),
            mailer,
            allowlist.clone(),
            Duration::from_secs(config.auth.code_ttl_seconds),
        ));

        let sessions = Arc::new(SessionStore::new(Arc::clone(&cache), &config.session));
        let rate_limiter = RateLimiter::new(Arc::clone(&cache), config.auth.rate_limits.enabled);

        Self {
            config: Arc::new(config),
            cache,
            clearpass: Arc::new(clearpass),
            otp,
            sessions,
            allowlist,
            rate_limiter,
        }
    }
}

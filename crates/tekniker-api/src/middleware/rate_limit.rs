//! Fixed-window rate limiting for the unauthenticated login endpoints.
//!
//! Counters live in the shared cache so several server processes enforce
//! one limit.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use tracing::warn;

use tekniker_cache::{CacheManager, keys};
use tekniker_core::config::auth::RateLimitRule;
use tekniker_core::error::AppError;
use tekniker_core::messages;
use tekniker_core::result::AppResult;
use tekniker_core::traits::cache::CacheProvider;

use crate::state::AppState;

/// Counts requests per client in fixed windows.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Counter storage.
    cache: Arc<CacheManager>,
    /// Whether limits are enforced.
    enabled: bool,
}

impl RateLimiter {
    /// Create a rate limiter.
    pub fn new(cache: Arc<CacheManager>, enabled: bool) -> Self {
        Self { cache, enabled }
    }

    /// Count one request and fail with the retry delay once any rule's
    /// limit is exceeded.
    ///
    /// Counter storage failures let the request through.
    pub async fn check(&self, endpoint: &str, client: &str, rules: &[RateLimitRule]) -> AppResult<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Utc::now().timestamp().max(0) as u64;
        for rule in rules {
            match self.hit(endpoint, client, *rule, now).await {
                Ok(None) => {}
                Ok(Some(retry_after)) => {
                    warn!(endpoint, client, limit = rule.limit, "Rate limit exceeded");
                    return Err(AppError::rate_limited(
                        messages::rate_limited(retry_after),
                        retry_after,
                    ));
                }
                Err(e) => {
                    warn!(endpoint, error = %e, "Rate limit counter unavailable");
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Returns the retry delay when this request exceeds `rule`.
    async fn hit(
        &self,
        endpoint: &str,
        client: &str,
        rule: RateLimitRule,
        now: u64,
    ) -> AppResult<Option<u64>> {
        let window = rule.window_seconds.max(1);
        let key = keys::rate_limit(endpoint, client, window, now / window);

        let count = self.cache.incr(&key).await?;
        if count == 1 {
            self.cache.expire(&key, Duration::from_secs(window)).await?;
        }

        if count > i64::from(rule.limit) {
            Ok(Some(window - now % window))
        } else {
            Ok(None)
        }
    }
}

/// Identify the client: the first `X-Forwarded-For` hop when trusted,
/// otherwise the peer address.
pub fn client_key(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        if let Some(ip) = forwarded_for(request.headers()) {
            return ip;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Limits `POST /request_auth_code`.
pub async fn limit_request_code(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_key(&request, state.config.server.trust_forwarded_for);
    state
        .rate_limiter
        .check(
            "request_auth_code",
            &client,
            &state.config.auth.rate_limits.request_code,
        )
        .await?;
    Ok(next.run(request).await)
}

/// Limits `POST /login`.
pub async fn limit_login(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_key(&request, state.config.server.trust_forwarded_for);
    state
        .rate_limiter
        .check("login", &client, &state.config.auth.rate_limits.login)
        .await?;
    Ok(next.run(request).await)
}

//! OAuth2 client-credentials token cache.

use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use tekniker_core::config::clearpass::ClearPassConfig;
use tekniker_core::error::{AppError, ErrorKind};
use tekniker_core::messages;
use tekniker_core::result::AppResult;

/// Upper bound on a token lifetime, whatever the token endpoint claims.
const MAX_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Clamp a lifetime in seconds into `0..=MAX_TOKEN_TTL_SECONDS`.
fn bounded_seconds(seconds: i64) -> Duration {
    Duration::try_seconds(seconds.clamp(0, MAX_TOKEN_TTL_SECONDS)).unwrap_or_else(Duration::zero)
}

fn bounded_config_seconds(seconds: u64) -> Duration {
    bounded_seconds(i64::try_from(seconds).unwrap_or(i64::MAX))
}

/// A bearer token and the instant it should be replaced.
#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
    refresh_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.refresh_at
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

/// Process-wide holder of the ClearPass access token.
///
/// Concurrent callers wait on the same refresh; the token endpoint is hit
/// at most once per expiry.
pub struct TokenCache {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// `{base}/api/oauth`.
    token_url: Url,
    /// OAuth2 client id.
    client_id: String,
    /// OAuth2 client secret.
    client_secret: String,
    /// Refresh this long before nominal expiry.
    refresh_margin: Duration,
    /// Lifetime assumed when the response has no `expires_in`.
    default_ttl: Duration,
    /// The single token slot.
    slot: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .field("refresh_margin", &self.refresh_margin)
            .finish()
    }
}

impl TokenCache {
    /// Create an empty token cache.
    pub fn new(http: reqwest::Client, token_url: Url, config: &ClearPassConfig) -> Self {
        Self {
            http,
            token_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_margin: bounded_config_seconds(config.token_refresh_margin_seconds),
            default_ttl: bounded_config_seconds(config.default_token_ttl_seconds),
            slot: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, fetching a new one when needed.
    pub async fn get_token(&self) -> AppResult<String> {
        let mut slot = self.slot.lock().await;
        let now = Utc::now();

        if let Some(cached) = slot.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(cached.token.clone());
        }

        let fresh = self.fetch(now).await?;
        let token = fresh.token.clone();
        *slot = Some(fresh);
        Ok(token)
    }

    /// Drop the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            info!("ClearPass access token invalidated");
        }
    }

    /// Expiry of the currently cached token, if any.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.slot.lock().await.as_ref().map(|t| t.expires_at)
    }

    async fn fetch(&self, now: DateTime<Utc>) -> AppResult<CachedToken> {
        let request = TokenRequest {
            grant_type: "client_credentials",
            client_id: &self.client_id,
            client_secret: &self.client_secret,
        };

        let response = self
            .http
            .post(self.token_url.clone())
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "ClearPass token request failed");
                AppError::with_source(ErrorKind::ExternalService, messages::UPSTREAM_AUTH_FAILED, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "ClearPass rejected token request");
            return Err(AppError::external(messages::UPSTREAM_AUTH_FAILED));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Unreadable ClearPass token response");
            AppError::with_source(ErrorKind::ExternalService, messages::UPSTREAM_AUTH_FAILED, e)
        })?;

        let Some(token) = body.access_token.filter(|t| !t.is_empty()) else {
            error!("ClearPass token response has no access_token");
            return Err(AppError::external(messages::UPSTREAM_AUTH_FAILED));
        };

        let ttl = body.expires_in.map(bounded_seconds).unwrap_or(self.default_ttl);
        // Short-lived tokens would otherwise never count as fresh.
        let margin = self.refresh_margin.min(ttl / 2);

        let expires_at = now.checked_add_signed(ttl).unwrap_or(now);
        let refresh_at = expires_at.checked_sub_signed(margin).unwrap_or(now);

        debug!(ttl_seconds = ttl.num_seconds(), "ClearPass access token fetched");
        Ok(CachedToken {
            token,
            expires_at,
            refresh_at,
        })
    }
}

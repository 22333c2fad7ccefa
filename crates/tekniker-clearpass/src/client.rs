//! Authenticated JSON requests against the ClearPass REST API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Url};
use serde_json::Value;
use tracing::{debug, error, warn};

use tekniker_core::config::clearpass::ClearPassConfig;
use tekniker_core::error::{AppError, ErrorKind};
use tekniker_core::result::AppResult;

use crate::token::TokenCache;

/// ClearPass API client.
#[derive(Debug, Clone)]
pub struct ClearPassClient {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Server base URL.
    base_url: Url,
    /// Access token cache.
    tokens: Arc<TokenCache>,
    /// Role mapping that lists the guest roles.
    role_mapping_name: String,
}

impl ClearPassClient {
    /// Build a client from configuration.
    pub fn new(config: &ClearPassConfig) -> AppResult<Self> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid clearpass.base_url '{}'", config.base_url),
                e,
            )
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        let token_url = join_segments(&base_url, &["api", "oauth"])?;
        let tokens = Arc::new(TokenCache::new(http.clone(), token_url, config));

        Ok(Self {
            http,
            base_url,
            tokens,
            role_mapping_name: config.role_mapping_name.clone(),
        })
    }

    /// The access token cache.
    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// Name of the role mapping listed by [`Self::list_roles`].
    pub fn role_mapping_name(&self) -> &str {
        &self.role_mapping_name
    }

    /// Build `{base}/seg1/seg2/...`, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        join_segments(&self.base_url, segments)
    }

    /// Send an authenticated request and return the JSON body.
    ///
    /// Upstream 400/404/422 keep their status with the upstream body in
    /// `details`; a 401 drops the cached token. Every other failure becomes
    /// an external-service error carrying `failure_message`.
    pub(crate) async fn send_json(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        failure_message: &'static str,
    ) -> AppResult<Value> {
        let token = self.tokens.get_token().await?;

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let path = url.path().to_string();
        debug!(%method, path = %path, "ClearPass request");

        let response = request.send().await.map_err(|e| {
            error!(%method, path = %path, error = %e, "ClearPass request failed");
            AppError::with_source(ErrorKind::ExternalService, failure_message, e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            error!(%method, path = %path, error = %e, "Failed to read ClearPass response");
            AppError::with_source(ErrorKind::ExternalService, failure_message, e)
        })?;

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(Value::Object(Default::default()));
            }
            return serde_json::from_slice(&bytes).map_err(|e| {
                error!(%method, path = %path, error = %e, "ClearPass returned invalid JSON");
                AppError::with_source(ErrorKind::ExternalService, failure_message, e)
            });
        }

        let detail = serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        match status.as_u16() {
            401 => {
                warn!(%method, path = %path, "ClearPass rejected access token");
                self.tokens.invalidate().await;
                Err(AppError::external(failure_message))
            }
            code @ (400 | 404 | 422) => {
                warn!(%method, path = %path, status = code, "ClearPass rejected request");
                Err(AppError::upstream(code, failure_message).with_details(detail))
            }
            code => {
                error!(%method, path = %path, status = code, %detail, "ClearPass request failed");
                Err(AppError::external(failure_message))
            }
        }
    }
}

fn join_segments(base: &Url, segments: &[&str]) -> AppResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| AppError::configuration("clearpass.base_url cannot be a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

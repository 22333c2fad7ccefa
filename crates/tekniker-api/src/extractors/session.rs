//! Session extractors: resolve the `session` cookie or a bearer token to a
//! server-side [`Session`].

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use tekniker_auth::session::Session;
use tekniker_core::error::AppError;
use tekniker_core::messages;

use crate::state::AppState;

/// A logged-in technician. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

impl AuthSession {
    /// Email of the logged-in technician.
    pub fn email(&self) -> &str {
        &self.0.user_email
    }
}

impl std::ops::Deref for AuthSession {
    type Target = Session;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The session token presented by the client, if any, whether or not it
/// resolves to a live session.
#[derive(Debug, Clone)]
pub struct MaybeSession {
    /// Raw token from the cookie or `Authorization` header.
    pub token: Option<String>,
    /// The live session behind the token.
    pub session: Option<Session>,
}

/// Read the session token: cookie first, then `Authorization: Bearer`.
pub fn session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(cookie_name) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts, &state.config.session.cookie_name);
        let session = match &token {
            Some(t) => state.sessions.find(t).await?,
            None => None,
        };
        Ok(Self { token, session })
    }
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        MaybeSession::from_request_parts(parts, state)
            .await?
            .session
            .map(AuthSession)
            .ok_or_else(|| AppError::authentication(messages::AUTH_REQUIRED))
    }
}

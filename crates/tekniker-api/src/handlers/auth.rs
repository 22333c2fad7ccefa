//! Auth handlers: code request, login, logout, login status.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

use tekniker_core::error::AppError;
use tekniker_core::messages;

use crate::dto::request::{LoginRequest, RequestCodeRequest};
use crate::dto::response::{LoginResponse, LoginStatusResponse, MessageResponse};
use crate::extractors::{JsonBody, MaybeSession};
use crate::state::AppState;

/// POST /request_auth_code
pub async fn request_auth_code(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RequestCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.otp.request_code(&req.email).await?;
    Ok(Json(MessageResponse::new(messages::CODE_SENT)))
}

/// POST /login
///
/// Verifies the emailed code, opens a session and sets the session cookie.
/// The token is also returned for `Authorization: Bearer` clients.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let email = state.otp.verify_code(&req.email, &req.code).await?;
    let session = state.sessions.create(&email).await?;

    let cookie = Cookie::build((
        state.config.session.cookie_name.clone(),
        session.session_token.clone(),
    ))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(state.config.session.cookie_secure);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: messages::LOGIN_OK.to_string(),
            session_token: session.session_token,
        }),
    ))
}

/// POST /logout
///
/// Always succeeds; destroys the server-side session when one is presented
/// and always sends an expired session cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    current: MaybeSession,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    if let Some(token) = &current.token {
        state.sessions.destroy(token).await?;
    }
    if let Some(session) = &current.session {
        info!(email = %session.user_email, "Logged out");
    }

    let mut expired = Cookie::build((state.config.session.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session.cookie_secure)
        .build();
    expired.make_removal();

    Ok((jar.add(expired), Json(MessageResponse::new(messages::LOGGED_OUT))))
}

/// GET /is_logged_in
pub async fn is_logged_in(current: MaybeSession) -> Json<LoginStatusResponse> {
    Json(LoginStatusResponse {
        logged_in: current.session.is_some(),
        email: current.session.map(|s| s.user_email).unwrap_or_default(),
    })
}

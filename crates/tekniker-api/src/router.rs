//! Route definitions for the CP-Tekniker HTTP API.
//!
//! Paths match the bundled front-end, so they are mounted at the root.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};

use crate::handlers;
use crate::middleware::rate_limit;
use crate::state::AppState;

/// Build the Axum router with all routes.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    Router::new()
        .merge(auth_routes(&state))
        .merge(device_routes())
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(state)
}

/// Code request, login, logout, login status
fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/request_auth_code",
            post(handlers::auth::request_auth_code).route_layer(
                axum_middleware::from_fn_with_state(state.clone(), rate_limit::limit_request_code),
            ),
        )
        .route(
            "/login",
            post(handlers::auth::login).route_layer(axum_middleware::from_fn_with_state(
                state.clone(),
                rate_limit::limit_login,
            )),
        )
        .route("/logout", post(handlers::auth::logout))
        .route("/is_logged_in", get(handlers::auth::is_logged_in))
}

/// ClearPass device and role proxy (session required)
fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/get_device_info", get(handlers::device::get_device_info))
        .route("/create_device", post(handlers::device::create_device))
        .route(
            "/update_device",
            patch(handlers::device::update_device).post(handlers::device::update_device),
        )
        .route("/GetDeviceRoles", get(handlers::roles::get_device_roles))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

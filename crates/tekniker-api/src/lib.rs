//! # tekniker-api
//!
//! HTTP API layer for CP-Tekniker built on Axum.
//!
//! Provides the login and device endpoints, session extraction, rate
//! limiting, CORS and request logging. Errors render through the
//! `IntoResponse` impl in `tekniker_core::response`.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;

//! # tekniker-core
//!
//! Core crate for CP-Tekniker. Contains the configuration schema, the
//! cache and mailer traits implemented by other crates, the user-facing
//! messages, the unified error system, and its HTTP rendering.
//!
//! This crate has **no** internal dependencies on other CP-Tekniker crates.

pub mod config;
pub mod error;
pub mod messages;
pub mod response;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;

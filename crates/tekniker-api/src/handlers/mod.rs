//! Route handlers.

pub mod auth;
pub mod device;
pub mod health;
pub mod roles;

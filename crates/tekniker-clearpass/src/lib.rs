//! # tekniker-clearpass
//!
//! Thin client for the ClearPass REST API.
//!
//! - `token` — OAuth2 client-credentials token cache
//! - `client` — authenticated JSON requests and upstream error mapping
//! - `device` — device lookup, creation and update
//! - `roles` — guest role listing and reshaping
//! - `mac` — MAC address validation

pub mod client;
pub mod device;
pub mod mac;
pub mod roles;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ClearPassClient;
pub use mac::validate_mac;
pub use roles::{DeviceRole, extract_roles, filter_roles};
pub use token::TokenCache;

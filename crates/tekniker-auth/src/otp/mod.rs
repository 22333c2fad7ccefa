//! One-time login codes: generation, issuing and verification.

pub mod code;
pub mod service;

pub use code::{codes_match, generate_code};
pub use service::OtpService;

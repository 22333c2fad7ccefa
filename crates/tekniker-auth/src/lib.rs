//! # tekniker-auth
//!
//! Technician authentication for CP-Tekniker.
//!
//! ## Modules
//!
//! - `allowlist` — approved emails/domains and the roles they grant
//! - `otp` — one-time code generation, issuing and verification
//! - `session` — server-side sessions stored in the TTL cache
//! - `mail` — SMTP delivery of login codes

pub mod allowlist;
pub mod mail;
pub mod otp;
pub mod session;

pub use allowlist::{AllowList, AllowListEntry, AllowListLoader, AllowedRole};
pub use mail::SmtpMailer;
pub use otp::OtpService;
pub use session::{Session, SessionStore};

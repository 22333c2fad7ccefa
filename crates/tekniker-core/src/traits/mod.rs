//! Core traits defined in `tekniker-core` and implemented by other crates.

pub mod cache;
pub mod mailer;

pub use cache::CacheProvider;
pub use mailer::Mailer;

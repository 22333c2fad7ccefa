//! Delivery of one-time login codes by email.

pub mod smtp;
pub mod template;

pub use smtp::SmtpMailer;
pub use template::AuthCodeEmail;

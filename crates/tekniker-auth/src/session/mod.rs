//! Server-side sessions opened after a successful code login.

pub mod store;
pub mod token;

pub use store::{Session, SessionStore};
pub use token::generate_session_token;

//! Allow-list of approved technician emails and domains.
//!
//! The list is a JSON array of `{email, roles}` entries where `email` is
//! either a full address or a bare domain. It is read from disk on every
//! request that needs it, so edits take effect without a restart.

pub mod entry;
pub mod loader;

pub use entry::{AllowList, AllowListEntry, AllowedRole};
pub use loader::AllowListLoader;

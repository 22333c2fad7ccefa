//! Reads the allow-list file from disk.

use std::path::PathBuf;

use tracing::{debug, error};

use tekniker_core::error::{AppError, ErrorKind};
use tekniker_core::messages;
use tekniker_core::result::AppResult;

use super::entry::AllowList;

/// Loads the allow-list file on demand.
#[derive(Debug, Clone)]
pub struct AllowListLoader {
    /// Path to the JSON file.
    path: PathBuf,
}

impl AllowListLoader {
    /// Create a loader for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and parse the file.
    pub async fn load(&self) -> AppResult<AllowList> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Failed to read allow-list");
            AppError::with_source(ErrorKind::Internal, messages::ALLOWLIST_LOAD_FAILED, e)
        })?;

        let list: AllowList = serde_json::from_str(&raw).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Failed to parse allow-list");
            AppError::with_source(ErrorKind::Internal, messages::ALLOWLIST_LOAD_FAILED, e)
        })?;

        debug!(entries = list.entries().len(), "Allow-list loaded");
        Ok(list)
    }
}

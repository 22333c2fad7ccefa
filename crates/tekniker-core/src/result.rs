//! Convenience result type alias for CP-Tekniker.

use crate::error::AppError;

/// A specialized `Result` type for CP-Tekniker operations.
pub type AppResult<T> = Result<T, AppError>;

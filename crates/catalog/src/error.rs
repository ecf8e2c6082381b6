//! Error types for the catalog stores.

use thiserror::Error;

/// Errors surfaced by the store collaborators.
///
/// The taxonomy is deliberately small: a referenced record is missing, a
/// uniqueness constraint was violated, a record failed validation, or the
/// store itself is unreachable.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced record doesn't exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    /// A record with the same key already exists
    #[error("{entity} {id} already exists")]
    Conflict { entity: &'static str, id: u32 },

    /// A record failed validation on write
    #[error("invalid {field}: {reason}")]
    InvalidRecord { field: &'static str, reason: String },

    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;

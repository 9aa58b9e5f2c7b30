//! Error types for file collection operations
//!
//! All of these are local and recoverable: the collection is left unchanged
//! whenever an operation returns an error.

use super::types::FileId;
use thiserror::Error;

/// Errors returned by `FileStore` lifecycle operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The identifier does not name a record in the collection
    #[error("File not found: {0}")]
    NotFound(FileId),

    /// The record is not in the lifecycle state the operation expects
    #[error("Invalid state for file {id}: {reason}")]
    InvalidState { id: FileId, reason: String },

    /// A record with this identifier is already in the collection
    #[error("Duplicate file id: {0}")]
    DuplicateId(FileId),

    /// The record breaks one of its own consistency rules
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: FileId, reason: String },

    /// Display names must contain at least one non-whitespace character
    #[error("Invalid file name: '{0}'")]
    InvalidName(String),
}

impl StoreError {
    pub(crate) fn invalid_state(id: &FileId, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            id: id.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_record(id: &FileId, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            id: id.clone(),
            reason: reason.into(),
        }
    }
}

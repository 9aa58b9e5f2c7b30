//! Database-specific error types
//!
//! This module defines all error types that can occur during database operations.
//!
//! # Error Types
//!
//! - **`SledError`**: Errors from the underlying sled embedded database
//! - **`DecodeError`**: Failures when deserializing data from the database
//! - **`EncodeError`**: Failures when serializing data to the database
//! - **`Corrupt`**: Stored data decoded but violates a collection invariant
//!
//! All errors implement `std::error::Error` via the `thiserror` crate.

use thiserror::Error;

/// Database-specific errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding data: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding data: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    /// Stored key has an unexpected shape
    #[error("Invalid key in tree '{tree}': {reason}")]
    InvalidKey { tree: String, reason: String },

    /// Stored data is readable but inconsistent
    #[error("Corrupt data: {0}")]
    Corrupt(String),
}

//! PermiDrive - a local, simulated cloud drive
//!
//! This library keeps a signed-in user's file collection with trash and
//! restore, filtered and sorted views, share links and storage accounting,
//! persisted in an embedded database.

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod demo;
pub mod logging;
pub mod mime;
pub mod output;
pub mod query;
pub mod session;
pub mod share;
pub mod store;
pub mod trash;
pub mod upload;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum DriveError {
    /// Database error
    #[error("Database error: {0}")]
    Db(#[from] db::DbError),
    /// File collection error
    #[error(transparent)]
    Store(#[from] store::StoreError),
    /// Share link error
    #[error(transparent)]
    Share(#[from] share::ShareError),
    /// Upload refused
    #[error("Upload failed: {0}")]
    Upload(#[from] upload::UploadError),
    /// Session error
    #[error(transparent)]
    Session(#[from] session::SessionError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Prompt error
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

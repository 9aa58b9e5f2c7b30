//! Error types for share link operations

use thiserror::Error;

/// Errors that can occur when creating or opening share links
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    /// No link with this id or token
    #[error("Share link '{0}' not found")]
    NotFound(String),

    /// The link's expiry date has passed
    #[error("Share link '{0}' has expired")]
    Expired(String),

    /// The link is password protected and no password was given
    #[error("This link is password protected")]
    PasswordRequired,

    /// The given password does not match
    #[error("Incorrect password")]
    InvalidPassword,

    /// The link only opens for signed-in users
    #[error("Sign in to open this link")]
    SignInRequired,
}

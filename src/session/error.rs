//! Error types for session operations

use crate::db::DbError;
use crate::share::ShareError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors raised while working inside a signed-in session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not signed in. Run 'permidrive signin' first")]
    NotSignedIn,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Share(#[from] ShareError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileId;

    #[test]
    fn test_store_error_is_transparent() {
        let error: SessionError = StoreError::NotFound(FileId::new("9")).into();
        assert_eq!(error.to_string(), StoreError::NotFound(FileId::new("9")).to_string());
    }

    #[test]
    fn test_not_signed_in_mentions_signin() {
        assert!(SessionError::NotSignedIn.to_string().contains("signin"));
    }
}

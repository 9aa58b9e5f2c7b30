//! Error types for upload validation and ingestion

use thiserror::Error;

/// Reasons a file or batch is refused
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Too many files: {count} selected, at most {max} per upload")]
    TooManyFiles { count: usize, max: usize },

    #[error("File too large. Maximum size is {max}")]
    TooLarge { size: u64, max: String },

    #[error("File type not supported: {0}")]
    TypeNotAllowed(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let error = UploadError::TooManyFiles { count: 12, max: 10 };
        assert_eq!(error.to_string(), "Too many files: 12 selected, at most 10 per upload");

        let error = UploadError::TypeNotAllowed("application/x-msdownload".into());
        assert!(error.to_string().starts_with("File type not supported"));
    }
}

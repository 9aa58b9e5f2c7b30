//! Upload ingestion
//!
//! Turns local files into `FileRecord` values for the signed-in user after
//! checking them against the configured storage limits. A batch reports one
//! `UploadProgress` per input; a bad file is marked `Error` and the rest of
//! the batch carries on.

use crate::config::StorageConfig;
use crate::output::human_size;
use crate::store::{FileId, FileRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub mod error;

pub use error::UploadError;

type Result<T> = std::result::Result<T, UploadError>;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Upload limits in effect for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    pub max_files_per_upload: usize,
    pub allowed_types: Vec<String>,
}

impl From<&StorageConfig> for UploadPolicy {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            max_files_per_upload: config.max_files_per_upload,
            allowed_types: config.allowed_types.iter().map(|t| t.to_lowercase()).collect(),
        }
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl UploadPolicy {
    /// # Errors
    ///
    /// Returns `UploadError::TooManyFiles` if `count` exceeds the per-upload limit.
    pub fn validate_batch(&self, count: usize) -> Result<()> {
        if count > self.max_files_per_upload {
            return Err(UploadError::TooManyFiles {
                count,
                max: self.max_files_per_upload,
            });
        }
        Ok(())
    }

    /// Check a single file's type, then its size
    ///
    /// # Errors
    ///
    /// Returns `UploadError::TypeNotAllowed` or `UploadError::TooLarge`.
    pub fn validate_file(&self, size: u64, mime_type: &str) -> Result<()> {
        let mime_type = mime_type.to_lowercase();
        if !self.allowed_types.contains(&mime_type) {
            return Err(UploadError::TypeNotAllowed(mime_type));
        }
        if size > self.max_file_size {
            return Err(UploadError::TooLarge {
                size,
                max: human_size(self.max_file_size),
            });
        }
        Ok(())
    }

    /// Build a record for the file at `path`
    ///
    /// The MIME type is guessed from the extension.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the file cannot be inspected,
    /// `UploadError::NotAFile` for directories and other non-files, or a
    /// validation error.
    pub fn ingest(&self, path: &Path, user_id: &str, now: DateTime<Utc>) -> Result<FileRecord> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(UploadError::NotAFile(path.display().to_string()));
        }

        let mime_type = guess_mime(path);
        self.validate_file(metadata.len(), &mime_type)?;

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        debug!(%name, %mime_type, size = metadata.len(), "ingested file");
        Ok(FileRecord::new(FileId::generate(), name, metadata.len(), mime_type, user_id, now))
    }

    /// Ingest every path, recording a status for each
    ///
    /// # Errors
    ///
    /// Returns `UploadError::TooManyFiles` without touching any file when the
    /// batch is over the limit. Per-file failures are reported in the result.
    pub fn ingest_batch<P: AsRef<Path>>(&self, paths: &[P], user_id: &str, now: DateTime<Utc>) -> Result<UploadBatch> {
        self.validate_batch(paths.len())?;

        let mut batch = UploadBatch::default();
        for path in paths {
            let path = path.as_ref();
            let file_name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            match self.ingest(path, user_id, now) {
                Ok(record) => {
                    batch.progress.push(UploadProgress::completed(&record));
                    batch.records.push(record);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "rejected upload");
                    batch.progress.push(UploadProgress::failed(file_name, &e));
                }
            }
        }
        Ok(batch)
    }
}

/// MIME type for a path, from its extension
#[must_use]
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

/// State of one file in an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Completed,
    Error,
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploading => f.write_str("uploading"),
            Self::Completed => f.write_str("completed"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Per-file upload report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub file_name: String,
    pub file_id: Option<FileId>,
    /// Percent complete: 0 until the file is stored, then 100
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<String>,
}

impl UploadProgress {
    #[must_use]
    pub fn pending(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            file_id: None,
            progress: 0,
            status: UploadStatus::Uploading,
            error: None,
        }
    }

    #[must_use]
    pub fn completed(record: &FileRecord) -> Self {
        Self {
            file_name: record.name.clone(),
            file_id: Some(record.id.clone()),
            progress: 100,
            status: UploadStatus::Completed,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(file_name: impl Into<String>, error: &UploadError) -> Self {
        Self {
            error: Some(error.to_string()),
            status: UploadStatus::Error,
            ..Self::pending(file_name)
        }
    }
}

/// Outcome of `ingest_batch`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadBatch {
    /// Accepted records, in input order
    pub records: Vec<FileRecord>,
    /// One entry per input path, in input order
    pub progress: Vec<UploadProgress>,
}

impl UploadBatch {
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.progress
            .iter()
            .filter(|p| p.status == UploadStatus::Error)
            .count()
    }

    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, write_file};

    fn small_policy() -> UploadPolicy {
        UploadPolicy {
            max_file_size: 16,
            max_files_per_upload: 3,
            allowed_types: vec!["text/plain".into(), "image/png".into()],
        }
    }

    #[test]
    fn test_default_policy_matches_storage_defaults() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.max_file_size, 100 * 1024 * 1024);
        assert_eq!(policy.max_files_per_upload, 10);
        assert!(policy.allowed_types.iter().any(|t| t == "application/pdf"));
    }

    #[test]
    fn test_validate_batch() {
        let policy = small_policy();
        assert!(policy.validate_batch(3).is_ok());
        assert!(matches!(
            policy.validate_batch(4),
            Err(UploadError::TooManyFiles { count: 4, max: 3 })
        ));
    }

    #[test]
    fn test_validate_file_checks_type_before_size() {
        let policy = small_policy();
        assert!(policy.validate_file(16, "text/plain").is_ok());
        assert!(policy.validate_file(1, "TEXT/PLAIN").is_ok());
        assert!(matches!(
            policy.validate_file(17, "text/plain"),
            Err(UploadError::TooLarge { size: 17, .. })
        ));
        assert!(matches!(
            policy.validate_file(1000, "application/x-sh"),
            Err(UploadError::TypeNotAllowed(_))
        ));
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_mime(Path::new("photo.PNG")), "image/png");
        assert_eq!(guess_mime(Path::new("mystery")), FALLBACK_MIME);
    }

    #[test]
    fn test_ingest_builds_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "hello.txt", b"hello");

        let record = small_policy().ingest(&path, "u1", at(2024, 5, 1)).unwrap();
        assert_eq!(record.name, "hello.txt");
        assert_eq!(record.size, 5);
        assert_eq!(record.mime_type, "text/plain");
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.created_at, at(2024, 5, 1));
        assert!(!record.is_deleted);
        assert!(uuid::Uuid::parse_str(record.id.as_str()).is_ok());
    }

    #[test]
    fn test_ingest_rejects_directory_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let policy = small_policy();
        assert!(matches!(
            policy.ingest(dir.path(), "u1", at(2024, 5, 1)),
            Err(UploadError::NotAFile(_))
        ));
        assert!(matches!(
            policy.ingest(&dir.path().join("missing.txt"), "u1", at(2024, 5, 1)),
            Err(UploadError::Io(_))
        ));
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let ok = write_file(dir.path(), "a.txt", b"fine");
        let big = write_file(dir.path(), "b.txt", &[b'x'; 64]);
        let script = write_file(dir.path(), "c.sh", b"echo");

        let batch = small_policy()
            .ingest_batch(&[ok, big, script], "u1", at(2024, 5, 1))
            .unwrap();

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.progress.len(), 3);
        assert_eq!(batch.failed_count(), 2);
        assert_eq!(batch.total_size(), 4);

        assert_eq!(batch.progress[0].status, UploadStatus::Completed);
        assert_eq!(batch.progress[0].progress, 100);
        assert_eq!(batch.progress[0].file_id.as_ref(), Some(&batch.records[0].id));
        assert_eq!(batch.progress[1].status, UploadStatus::Error);
        assert_eq!(batch.progress[1].progress, 0);
        assert!(batch.progress[1].error.as_deref().unwrap().contains("too large"));
        assert_eq!(batch.progress[2].file_name, "c.sh");
    }

    #[test]
    fn test_batch_over_limit_fails_up_front() {
        let paths = ["a", "b", "c", "d"];
        assert!(matches!(
            small_policy().ingest_batch(&paths, "u1", at(2024, 5, 1)),
            Err(UploadError::TooManyFiles { .. })
        ));
    }
}

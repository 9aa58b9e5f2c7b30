//! File record types
//!
//! This module defines the metadata entry for a single stored file and the
//! identifier type used to address it inside a collection.
//!
//! # Types
//!
//! - **`FileId`**: Stable identifier of a record, unique within a collection
//! - **`FileRecord`**: All metadata for one (simulated) uploaded file
//!
//! # Invariants
//!
//! - `deleted_at` is `Some` if and only if `is_deleted` is true
//! - `updated_at` is never earlier than `created_at`
//! - `is_public` records carry a non-empty `shared_token`

use super::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a file record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(String);

impl FileId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for FileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Metadata entry for one file in a user's drive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub name: String,
    /// Size in bytes, fixed at upload time
    pub size: u64,
    pub mime_type: String,
    pub thumbnail_url: Option<String>,
    pub folder_id: Option<String>,
    pub user_id: String,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_public: bool,
    pub shared_token: Option<String>,
}

impl FileRecord {
    /// Create a new active, private record
    ///
    /// `created_at` and `updated_at` are both set to `now`.
    #[must_use]
    pub fn new(
        id: FileId,
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        user_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            thumbnail_url: None,
            folder_id: None,
            user_id: user_id.into(),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
            is_public: false,
            shared_token: None,
        }
    }

    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Override the update timestamp (clamped so it never precedes creation)
    #[must_use]
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at.max(self.created_at);
        self
    }

    /// Check the record's internal consistency
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidRecord` naming the first violated invariant.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.is_deleted != self.deleted_at.is_some() {
            return Err(StoreError::invalid_record(
                &self.id,
                format!("is_deleted={} but deleted_at={:?}", self.is_deleted, self.deleted_at),
            ));
        }
        if self.updated_at < self.created_at {
            return Err(StoreError::invalid_record(&self.id, "updated before it was created"));
        }
        if self.is_public && self.shared_token.as_deref().is_none_or(str::is_empty) {
            return Err(StoreError::invalid_record(&self.id, "public without a share token"));
        }
        Ok(())
    }
}

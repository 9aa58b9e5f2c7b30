//! File collection store
//!
//! Holds the authoritative, insertion-ordered list of `FileRecord` values for
//! one user session and owns their lifecycle transitions:
//!
//! ```text
//! active --soft_delete--> trashed --restore--> active
//!    \                      |
//!     \---permanent_delete--+--> (gone, no tombstone)
//! ```
//!
//! Listings are lazy iterators recomputed on every call, so they always
//! reflect the current contents.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use permidrive::store::{FileId, FileRecord, FileStore};
//!
//! let mut store = FileStore::new();
//! let record = FileRecord::new(FileId::new("1"), "notes.txt", 12, "text/plain", "u1", Utc::now());
//! store.insert(record).unwrap();
//!
//! store.soft_delete(&FileId::new("1")).unwrap();
//! assert_eq!(store.list_active().count(), 0);
//! assert_eq!(store.list_trashed().count(), 1);
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

pub mod error;
pub mod types;

pub use error::StoreError;
pub use types::{FileId, FileRecord};

type Result<T> = std::result::Result<T, StoreError>;

/// Insertion-ordered collection of file records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileStore {
    records: Vec<FileRecord>,
}

impl FileStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Build a store from records in their insertion order
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if two records share an identifier,
    /// or `StoreError::InvalidRecord` if any record is inconsistent.
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Result<Self> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Append a record to the collection
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if a record with the same id exists,
    /// or `StoreError::InvalidRecord` if the record fails `FileRecord::validate`.
    pub fn insert(&mut self, record: FileRecord) -> Result<()> {
        if self.position(&record.id).is_some() {
            return Err(StoreError::DuplicateId(record.id));
        }
        record.validate()?;
        debug!(id = %record.id, name = %record.name, "inserting file record");
        self.records.push(record);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &FileId) -> Option<&FileRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &FileId) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, active and trashed, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    /// Move a record to the trash, stamping the deletion time with the current clock
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is absent, or
    /// `StoreError::InvalidState` if the record is already trashed.
    pub fn soft_delete(&mut self, id: &FileId) -> Result<&FileRecord> {
        self.soft_delete_at(id, Utc::now())
    }

    /// Move a record to the trash with an explicit deletion time
    ///
    /// The record stays in the collection and shows up in `list_trashed`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is absent, or
    /// `StoreError::InvalidState` if the record is already trashed.
    pub fn soft_delete_at(&mut self, id: &FileId, now: DateTime<Utc>) -> Result<&FileRecord> {
        let record = self.get_mut(id)?;
        if record.is_deleted {
            return Err(StoreError::invalid_state(id, "file is already in the trash"));
        }
        record.is_deleted = true;
        record.deleted_at = Some(now);
        debug!(%id, "moved file to trash");
        Ok(&*record)
    }

    /// Bring a trashed record back to the active set
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is absent, or
    /// `StoreError::InvalidState` if the record is not in the trash.
    pub fn restore(&mut self, id: &FileId) -> Result<&FileRecord> {
        let record = self.get_mut(id)?;
        if !record.is_deleted {
            return Err(StoreError::invalid_state(id, "file is not in the trash"));
        }
        record.is_deleted = false;
        record.deleted_at = None;
        debug!(%id, "restored file from trash");
        Ok(&*record)
    }

    /// Remove a record from the collection for good
    ///
    /// Works on active and trashed records alike. Returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is absent.
    pub fn permanent_delete(&mut self, id: &FileId) -> Result<FileRecord> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let removed = self.records.remove(index);
        debug!(%id, "permanently deleted file");
        Ok(removed)
    }

    /// Active (non-deleted) records in insertion order
    pub fn list_active(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| !r.is_deleted)
    }

    /// Trashed records in insertion order
    pub fn list_trashed(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|r| r.is_deleted)
    }

    /// Change a record's display name
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is absent,
    /// `StoreError::InvalidName` if the name is blank, or
    /// `StoreError::InvalidState` if the record is in the trash.
    pub fn rename(&mut self, id: &FileId, name: &str, now: DateTime<Utc>) -> Result<&FileRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        let record = self.get_mut(id)?;
        if record.is_deleted {
            return Err(StoreError::invalid_state(id, "cannot rename a file in the trash"));
        }
        record.name = name.to_string();
        record.updated_at = now.max(record.created_at);
        Ok(&*record)
    }

    /// Mark a record as publicly shared under `token`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is absent, or
    /// `StoreError::InvalidState` if the record is trashed or the token is empty.
    pub fn set_public(&mut self, id: &FileId, token: &str) -> Result<&FileRecord> {
        let record = self.get_mut(id)?;
        if record.is_deleted {
            return Err(StoreError::invalid_state(id, "cannot share a file in the trash"));
        }
        if token.is_empty() {
            return Err(StoreError::invalid_state(id, "share token must not be empty"));
        }
        record.is_public = true;
        record.shared_token = Some(token.to_string());
        Ok(&*record)
    }

    /// Clear a record's public sharing flag and token
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is absent.
    pub fn clear_public(&mut self, id: &FileId) -> Result<&FileRecord> {
        let record = self.get_mut(id)?;
        record.is_public = false;
        record.shared_token = None;
        Ok(&*record)
    }

    /// Total bytes held by active records
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.list_active().map(|r| r.size).sum()
    }

    /// Total bytes held by trashed records
    #[must_use]
    pub fn trashed_size(&self) -> u64 {
        self.list_trashed().map(|r| r.size).sum()
    }

    /// Permanently delete every trashed record whose retention window has elapsed
    ///
    /// Returns the removed records in insertion order.
    pub fn purge_expired(&mut self, retention_days: u32, now: DateTime<Utc>) -> Vec<FileRecord> {
        let (expired, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.records).into_iter().partition(|r| {
                r.deleted_at
                    .is_some_and(|at| crate::trash::is_expired(at, retention_days, now))
            });
        self.records = kept;
        if !expired.is_empty() {
            debug!(count = expired.len(), "purged expired trash");
        }
        expired
    }

    /// Permanently delete every trashed record, returning them in insertion order
    pub fn empty_trash(&mut self) -> Vec<FileRecord> {
        let (trashed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.records).into_iter().partition(|r| r.is_deleted);
        self.records = kept;
        trashed
    }

    fn position(&self, id: &FileId) -> Option<usize> {
        self.records.iter().position(|r| &r.id == id)
    }

    fn get_mut(&mut self, id: &FileId) -> Result<&mut FileRecord> {
        self.records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

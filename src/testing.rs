//! Testing utilities for permidrive
//!
//! This module provides helper types and functions for writing tests,
//! including a `TestDb` wrapper for temporary database management and
//! builders for file records and users with fixed timestamps.
//!
//! Only available when compiled with `cfg(test)`.

use crate::db::Database;
use crate::session::{DEFAULT_STORAGE_LIMIT, User};
use crate::store::{FileId, FileRecord};
use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Wrapper for a temporary test database that cleans up on drop
///
/// The database lives in its own temporary directory, so tests can run in
/// parallel without sharing state.
pub struct TestDb {
    // Declared before `dir` so the database closes before the directory goes.
    db: Database,
    dir: TempDir,
}

impl TestDb {
    /// Open an empty database in a fresh temporary directory
    ///
    /// # Panics
    /// Panics if the directory or database cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = Database::open(dir.path().join("db")).expect("Failed to open test database");
        Self { db, dir }
    }

    /// Get a reference to the underlying database
    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// Get the path to the test database
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("db")
    }
}

/// Midnight UTC on the given date
///
/// # Panics
/// Panics on an invalid date.
#[must_use]
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid date")
}

/// A plain-text record owned by `u1`, created 2024-01-01
#[must_use]
pub fn record(id: &str, name: &str, size: u64) -> FileRecord {
    FileRecord::new(FileId::new(id), name, size, "text/plain", "u1", at(2024, 1, 1))
}

/// A 1 KiB record with the given MIME type, created 2024-01-01
#[must_use]
pub fn record_with_type(id: &str, name: &str, mime_type: &str) -> FileRecord {
    FileRecord::new(FileId::new(id), name, 1024, mime_type, "u1", at(2024, 1, 1))
}

/// A user with a fixed id and creation time
#[must_use]
pub fn user(id: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        name: "Test User".to_string(),
        email: email.to_string(),
        display_name: None,
        image: None,
        storage_limit: DEFAULT_STORAGE_LIMIT,
        created_at: at(2024, 1, 1),
        updated_at: at(2024, 1, 1),
    }
}

/// Write `content` to `dir/name` and return the path
///
/// # Panics
/// Panics if the file cannot be written.
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_basic() {
        let test_db = TestDb::new();
        assert!(test_db.path().exists());
        assert!(test_db.db().list_users().unwrap().is_empty());
    }

    #[test]
    fn test_db_cleanup() {
        let path = {
            let test_db = TestDb::new();
            let path = test_db.path();
            assert!(path.exists());
            path
        };

        assert!(!path.exists());
    }

    #[test]
    fn test_record_builders() {
        let r = record("1", "a.txt", 5);
        assert_eq!(r.size, 5);
        assert_eq!(r.created_at, r.updated_at);
        assert!(r.validate().is_ok());

        let typed = record_with_type("2", "b.png", "image/png");
        assert_eq!(typed.mime_type, "image/png");
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "hello.txt", b"hello");
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }
}

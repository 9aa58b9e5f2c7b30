//! Signed-in session context
//!
//! A `Session` owns everything that belongs to the signed-in user: their
//! profile, file collection and share links. It is created by signing in
//! (or resuming a previous sign-in from the database), passed explicitly to
//! every command, and written back with `save`. Signing out consumes it.
//!
//! Operations that touch both the collection and the share links live here
//! so the two never drift apart: sharing a file marks it public, revoking
//! the last link makes it private again, and permanently deleting a file
//! drops its links.

use crate::db::Database;
use crate::mime;
use crate::share::{ShareAccess, ShareError, ShareLink, ShareOptions, ShareRegistry};
use crate::store::{FileId, FileRecord, FileStore, StoreError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub mod error;
pub mod types;

pub use error::SessionError;
pub use types::{DEFAULT_STORAGE_LIMIT, ProfileUpdate, StorageUsage, User};

type Result<T> = std::result::Result<T, SessionError>;

/// The signed-in user's working state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub files: FileStore,
    pub shares: ShareRegistry,
}

/// Everything `export` writes out
#[derive(Serialize)]
struct Export<'a> {
    user: &'a User,
    files: Vec<&'a FileRecord>,
    shares: Vec<&'a ShareLink>,
}

impl Session {
    /// Sign `user` in and load whatever they stored previously
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` for a blank name or an email
    /// without an `@`, or `SessionError::Db` if persistence fails.
    pub fn sign_in(db: &Database, user: User) -> Result<Self> {
        if user.name.trim().is_empty() {
            return Err(SessionError::InvalidInput("name must not be empty".into()));
        }
        if !user.email.contains('@') {
            return Err(SessionError::InvalidInput(format!(
                "'{}' is not an email address",
                user.email
            )));
        }

        db.save_user(&user)?;
        db.set_current_user(&user.id)?;
        let files = db.load_files(&user.id)?;
        let shares = db.load_shares(&user.id)?;
        info!(user = %user.id, files = files.len(), "signed in");
        Ok(Self { user, files, shares })
    }

    /// Pick up the session left by a previous sign-in
    ///
    /// Returns `None` when nobody is signed in. A marker pointing at a
    /// profile that no longer exists is cleared.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Db` if reading the stored state fails.
    pub fn resume(db: &Database) -> Result<Option<Self>> {
        let Some(user_id) = db.current_user_id()? else {
            return Ok(None);
        };
        let Some(user) = db.get_user(&user_id)? else {
            warn!(user = %user_id, "session points at a missing user; signing out");
            db.clear_current_user()?;
            return Ok(None);
        };
        let files = db.load_files(&user.id)?;
        let shares = db.load_shares(&user.id)?;
        debug!(user = %user.id, "resumed session");
        Ok(Some(Self { user, files, shares }))
    }

    /// Resume the stored session or fail with `NotSignedIn`
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` when nobody is signed in.
    pub fn require(db: &Database) -> Result<Self> {
        Self::resume(db)?.ok_or(SessionError::NotSignedIn)
    }

    /// Write the profile, collection and share links back to the database
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Db` if any write fails.
    pub fn save(&self, db: &Database) -> Result<()> {
        db.save_user(&self.user)?;
        db.save_files(&self.user.id, &self.files)?;
        db.save_shares(&self.user.id, &self.shares)?;
        db.flush()?;
        Ok(())
    }

    /// Save and end the session; stored data stays for the next sign-in
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Db` if saving fails.
    pub fn sign_out(self, db: &Database) -> Result<User> {
        self.save(db)?;
        db.clear_current_user()?;
        info!(user = %self.user.id, "signed out");
        Ok(self.user)
    }

    /// Delete the account along with every file record and share link
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Db` if the data cannot be removed.
    pub fn delete_account(self, db: &Database) -> Result<User> {
        db.remove_user_data(&self.user.id)?;
        db.flush()?;
        info!(user = %self.user.id, "deleted account");
        Ok(self.user)
    }

    /// Apply profile changes, bumping `updated_at` when anything changed
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if the new name is blank.
    pub fn update_profile(&mut self, update: ProfileUpdate, now: DateTime<Utc>) -> Result<&User> {
        if update.is_empty() {
            return Ok(&self.user);
        }
        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(SessionError::InvalidInput("name must not be empty".into()));
            }
            self.user.name = name.to_string();
        }
        if let Some(display_name) = update.display_name {
            self.user.display_name = Some(display_name).filter(|n| !n.trim().is_empty());
        }
        if let Some(image) = update.image {
            self.user.image = Some(image).filter(|i| !i.trim().is_empty());
        }
        self.user.updated_at = now.max(self.user.created_at);
        Ok(&self.user)
    }

    /// Create a share link for an active file and mark the file public
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the file is absent, or
    /// `StoreError::InvalidState` if it is in the trash.
    pub fn share_file(&mut self, file_id: &FileId, options: ShareOptions, now: DateTime<Utc>) -> Result<ShareLink> {
        let file = self
            .files
            .get(file_id)
            .ok_or_else(|| StoreError::NotFound(file_id.clone()))?;
        if file.is_deleted {
            return Err(StoreError::invalid_state(file_id, "cannot share a file in the trash").into());
        }

        let link = self.shares.create(file, options, now).clone();
        self.files.set_public(file_id, &link.token)?;
        Ok(link)
    }

    /// Delete a share link
    ///
    /// The file stays public under its newest remaining link, or becomes
    /// private when no links are left.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::NotFound` if the link id is unknown.
    pub fn revoke_share(&mut self, link_id: &str) -> Result<ShareLink> {
        let link = self.shares.delete(link_id)?;
        let Some(trashed) = self.files.get(&link.file_id).map(|f| f.is_deleted) else {
            return Ok(link);
        };

        let remaining = self
            .shares
            .list_for_file(&link.file_id)
            .last()
            .map(|l| l.token.clone());
        match remaining {
            Some(token) if !trashed => {
                self.files.set_public(&link.file_id, &token)?;
            }
            _ => {
                self.files.clear_public(&link.file_id)?;
            }
        }
        Ok(link)
    }

    /// Open a share link as a recipient
    ///
    /// Links to files that are trashed or gone behave like unknown links.
    ///
    /// # Errors
    ///
    /// Returns the `ShareError` from the link's access checks.
    pub fn open_share(
        &mut self,
        token: &str,
        password: Option<&str>,
        signed_in: bool,
        now: DateTime<Utc>,
    ) -> Result<ShareAccess> {
        let file_id = self
            .shares
            .by_token(token)
            .map(|l| l.file_id.clone())
            .ok_or_else(|| ShareError::NotFound(token.to_string()))?;
        if self.files.get(&file_id).is_none_or(|f| f.is_deleted) {
            return Err(ShareError::NotFound(token.to_string()).into());
        }
        Ok(self.shares.access(token, password, signed_in, now)?)
    }

    /// Permanently delete a file together with its share links
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the file is absent.
    pub fn permanent_delete(&mut self, file_id: &FileId) -> Result<FileRecord> {
        let removed = self.files.permanent_delete(file_id)?;
        let links = self.shares.delete_for_file(file_id);
        if links > 0 {
            debug!(file = %file_id, links, "dropped share links of deleted file");
        }
        Ok(removed)
    }

    /// Permanently delete everything in the trash
    pub fn empty_trash(&mut self) -> Vec<FileRecord> {
        let removed = self.files.empty_trash();
        self.drop_links_for(&removed);
        info!(count = removed.len(), "emptied trash");
        removed
    }

    /// Permanently delete trashed files whose retention window has elapsed
    pub fn sweep_trash(&mut self, retention_days: u32, now: DateTime<Utc>) -> Vec<FileRecord> {
        let removed = self.files.purge_expired(retention_days, now);
        self.drop_links_for(&removed);
        if !removed.is_empty() {
            info!(count = removed.len(), retention_days, "swept expired trash");
        }
        removed
    }

    fn drop_links_for(&mut self, removed: &[FileRecord]) {
        for record in removed {
            self.shares.delete_for_file(&record.id);
        }
    }

    /// Storage used against the user's quota
    #[must_use]
    pub fn storage_usage(&self) -> StorageUsage {
        let breakdown: BTreeMap<&'static str, u64> = mime::group_by_category(self.files.list_active())
            .into_iter()
            .map(|(category, records)| (category, records.iter().map(|r| r.size).sum()))
            .collect();
        StorageUsage {
            active: self.files.total_size(),
            trashed: self.files.trashed_size(),
            limit: self.user.storage_limit,
            breakdown,
        }
    }

    /// Pretty-printed JSON of the profile, every file record and every share link
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Json` if serialization fails.
    pub fn export(&self) -> Result<String> {
        let export = Export {
            user: &self.user,
            files: self.files.iter().collect(),
            shares: self.shares.list().collect(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestDb, at, record, record_with_type, user};
    use chrono::Duration;

    fn session_with(ids: &[&str]) -> Session {
        Session {
            user: user("u1", "u1@example.com"),
            files: FileStore::from_records(ids.iter().map(|id| record(id, &format!("{id}.txt"), 10))).unwrap(),
            shares: ShareRegistry::new(),
        }
    }

    #[test]
    fn test_sign_in_persists_and_resumes() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let mut session = Session::sign_in(db, user("u1", "u1@example.com")).unwrap();
        session.files.insert(record("1", "a.txt", 3)).unwrap();
        session.save(db).unwrap();

        let resumed = Session::resume(db).unwrap().unwrap();
        assert_eq!(resumed, session);
    }

    #[test]
    fn test_sign_in_validates_input() {
        let test_db = TestDb::new();
        let db = test_db.db();

        assert!(matches!(
            Session::sign_in(db, user("u1", "not-an-email")),
            Err(SessionError::InvalidInput(_))
        ));
        assert_eq!(db.current_user_id().unwrap(), None);
    }

    #[test]
    fn test_resume_without_sign_in() {
        let test_db = TestDb::new();
        assert_eq!(Session::resume(test_db.db()).unwrap(), None);
        assert!(matches!(Session::require(test_db.db()), Err(SessionError::NotSignedIn)));
    }

    #[test]
    fn test_resume_clears_dangling_marker() {
        let test_db = TestDb::new();
        let db = test_db.db();
        db.set_current_user("ghost").unwrap();

        assert_eq!(Session::resume(db).unwrap(), None);
        assert_eq!(db.current_user_id().unwrap(), None);
    }

    #[test]
    fn test_sign_out_keeps_data() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let mut session = Session::sign_in(db, user("u1", "u1@example.com")).unwrap();
        session.files.insert(record("1", "a.txt", 3)).unwrap();
        session.sign_out(db).unwrap();

        assert_eq!(Session::resume(db).unwrap(), None);
        let again = Session::sign_in(db, user("u1", "u1@example.com")).unwrap();
        assert_eq!(again.files.len(), 1);
    }

    #[test]
    fn test_delete_account_removes_everything() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let mut session = Session::sign_in(db, user("u1", "u1@example.com")).unwrap();
        session.files.insert(record("1", "a.txt", 3)).unwrap();
        session.save(db).unwrap();
        session.delete_account(db).unwrap();

        assert_eq!(db.get_user("u1").unwrap(), None);
        assert!(db.load_files("u1").unwrap().is_empty());
        assert_eq!(Session::resume(db).unwrap(), None);
    }

    #[test]
    fn test_update_profile() {
        let mut session = session_with(&[]);
        let update = ProfileUpdate {
            display_name: Some("Johnny".into()),
            ..ProfileUpdate::default()
        };
        let user = session.update_profile(update, at(2024, 6, 1)).unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Johnny"));
        assert_eq!(user.updated_at, at(2024, 6, 1));

        let blank = ProfileUpdate {
            name: Some("  ".into()),
            ..ProfileUpdate::default()
        };
        assert!(matches!(
            session.update_profile(blank, at(2024, 6, 2)),
            Err(SessionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_share_file_marks_public() {
        let mut session = session_with(&["1"]);
        let id = FileId::new("1");

        let link = session.share_file(&id, ShareOptions::default(), at(2024, 1, 2)).unwrap();

        let file = session.files.get(&id).unwrap();
        assert!(file.is_public);
        assert_eq!(file.shared_token.as_deref(), Some(link.token.as_str()));
    }

    #[test]
    fn test_share_trashed_or_missing_file_fails() {
        let mut session = session_with(&["1"]);
        session.files.soft_delete_at(&FileId::new("1"), at(2024, 1, 2)).unwrap();

        assert!(matches!(
            session.share_file(&FileId::new("1"), ShareOptions::default(), at(2024, 1, 3)),
            Err(SessionError::Store(StoreError::InvalidState { .. }))
        ));
        assert!(matches!(
            session.share_file(&FileId::new("2"), ShareOptions::default(), at(2024, 1, 3)),
            Err(SessionError::Store(StoreError::NotFound(_)))
        ));
        assert!(session.shares.is_empty());
    }

    #[test]
    fn test_revoke_falls_back_to_remaining_link() {
        let mut session = session_with(&["1"]);
        let id = FileId::new("1");
        let first = session.share_file(&id, ShareOptions::default(), at(2024, 1, 2)).unwrap();
        let second = session.share_file(&id, ShareOptions::default(), at(2024, 1, 2)).unwrap();

        session.revoke_share(&second.id).unwrap();
        let file = session.files.get(&id).unwrap();
        assert!(file.is_public);
        assert_eq!(file.shared_token.as_deref(), Some(first.token.as_str()));

        session.revoke_share(&first.id).unwrap();
        let file = session.files.get(&id).unwrap();
        assert!(!file.is_public);
        assert!(file.shared_token.is_none());
    }

    #[test]
    fn test_open_share_of_trashed_file_is_not_found() {
        let mut session = session_with(&["1"]);
        let id = FileId::new("1");
        let link = session.share_file(&id, ShareOptions::default(), at(2024, 1, 2)).unwrap();

        assert!(session.open_share(&link.token, None, false, at(2024, 1, 3)).is_ok());

        session.files.soft_delete_at(&id, at(2024, 1, 4)).unwrap();
        assert!(matches!(
            session.open_share(&link.token, None, false, at(2024, 1, 5)),
            Err(SessionError::Share(ShareError::NotFound(_)))
        ));
    }

    #[test]
    fn test_permanent_delete_drops_links() {
        let mut session = session_with(&["1", "2"]);
        session.share_file(&FileId::new("1"), ShareOptions::default(), at(2024, 1, 2)).unwrap();
        session.share_file(&FileId::new("2"), ShareOptions::default(), at(2024, 1, 2)).unwrap();

        session.permanent_delete(&FileId::new("1")).unwrap();

        assert_eq!(session.shares.len(), 1);
        assert!(session.files.get(&FileId::new("1")).is_none());
    }

    #[test]
    fn test_sweep_trash_drops_links_of_purged_files() {
        let mut session = session_with(&["old", "new"]);
        let now = at(2024, 3, 1);
        session.share_file(&FileId::new("old"), ShareOptions::default(), at(2024, 1, 1)).unwrap();
        session.files.soft_delete_at(&FileId::new("old"), now - Duration::days(31)).unwrap();
        session.files.soft_delete_at(&FileId::new("new"), now - Duration::days(1)).unwrap();

        let removed = session.sweep_trash(30, now);

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, FileId::new("old"));
        assert!(session.shares.is_empty());
        assert_eq!(session.files.list_trashed().count(), 1);
    }

    #[test]
    fn test_empty_trash() {
        let mut session = session_with(&["a", "b"]);
        session.files.soft_delete_at(&FileId::new("a"), at(2024, 2, 1)).unwrap();

        let removed = session.empty_trash();
        assert_eq!(removed.len(), 1);
        assert_eq!(session.files.len(), 1);
    }

    #[test]
    fn test_storage_usage() {
        let mut session = session_with(&[]);
        session.files.insert(record_with_type("1", "a.jpg", "image/jpeg")).unwrap();
        session.files.insert(record_with_type("2", "b.png", "image/png")).unwrap();
        session.files.insert(record_with_type("3", "c.mp4", "video/mp4")).unwrap();
        session.files.soft_delete_at(&FileId::new("3"), at(2024, 2, 1)).unwrap();

        let usage = session.storage_usage();
        let image_bytes = session.files.get(&FileId::new("1")).unwrap().size
            + session.files.get(&FileId::new("2")).unwrap().size;
        assert_eq!(usage.breakdown.get("images"), Some(&image_bytes));
        assert!(!usage.breakdown.contains_key("videos"));
        assert_eq!(usage.active, image_bytes);
        assert_eq!(usage.limit, DEFAULT_STORAGE_LIMIT);
    }

    #[test]
    fn test_export_is_json() {
        let session = session_with(&["1"]);
        let json = session.export().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["user"]["email"], "u1@example.com");
        assert_eq!(value["files"].as_array().unwrap().len(), 1);
        assert_eq!(value["files"][0]["name"], "1.txt");
        assert!(value["shares"].as_array().unwrap().is_empty());
    }
}

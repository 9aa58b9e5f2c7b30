//! Database wrapper module for permidrive
//!
//! Persists the signed-in session, user profiles, and each user's file
//! collection and share links using sled as the embedded backend.
//!
//! Trees:
//! - `session`: the id of the currently signed-in user
//! - `users`: user id -> `User`
//! - `files:<user>`: sequence number -> `FileRecord`
//! - `shares:<user>`: sequence number -> `ShareLink`

use crate::session::User;
use crate::share::{ShareLink, ShareRegistry};
use crate::store::{FileRecord, FileStore, StoreError};
use sled::{Batch, Db, Tree};
use std::path::Path;
use tracing::debug;

pub mod error;
pub mod types;

pub use error::DbError;
pub use types::{SeqKey, TreeName, decode, encode};

const CURRENT_USER_KEY: &[u8] = b"current_user";

/// Database wrapper that encapsulates all database operations
pub struct Database {
    db: Db,
    session: Tree,
    users: Tree,
}

impl Database {
    /// Opens or creates a database at the specified path
    ///
    /// # Examples
    /// ```no_run
    /// use permidrive::db::Database;
    /// let db = Database::open("my_db").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the database cannot be opened or if the internal trees cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let db = sled::open(path)?;
        let session = db.open_tree("session")?;
        let users = db.open_tree("users")?;
        Ok(Self { db, session, users })
    }

    /// Id of the signed-in user, if any
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the read fails or the stored id is not UTF-8.
    pub fn current_user_id(&self) -> Result<Option<String>, DbError> {
        match self.session.get(CURRENT_USER_KEY)? {
            Some(value) => String::from_utf8(value.to_vec())
                .map(Some)
                .map_err(|e| DbError::Corrupt(format!("session user id: {e}"))),
            None => Ok(None),
        }
    }

    /// Mark `user_id` as the signed-in user
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the write fails.
    pub fn set_current_user(&self, user_id: &str) -> Result<(), DbError> {
        self.session.insert(CURRENT_USER_KEY, user_id.as_bytes())?;
        Ok(())
    }

    /// Forget the signed-in user; their data stays in place
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the write fails.
    pub fn clear_current_user(&self) -> Result<(), DbError> {
        self.session.remove(CURRENT_USER_KEY)?;
        Ok(())
    }

    /// Insert or update a user profile
    ///
    /// # Errors
    ///
    /// Returns `DbError` if encoding or the write fails.
    pub fn save_user(&self, user: &User) -> Result<(), DbError> {
        self.users.insert(user.id.as_bytes(), encode(user)?)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DbError` if the read or decoding fails.
    pub fn get_user(&self, user_id: &str) -> Result<Option<User>, DbError> {
        self.users
            .get(user_id.as_bytes())?
            .map(|value| decode(&value))
            .transpose()
    }

    /// Find a user by email address (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `DbError` if iteration or decoding fails.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        Ok(self
            .list_users()?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    /// All stored user profiles
    ///
    /// # Errors
    ///
    /// Returns `DbError` if iteration or decoding fails.
    pub fn list_users(&self) -> Result<Vec<User>, DbError> {
        let mut users = Vec::new();
        for result in &self.users {
            let (_, value) = result?;
            users.push(decode(&value)?);
        }
        Ok(users)
    }

    /// Remove a user profile, returning whether it existed
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the write fails.
    pub fn remove_user(&self, user_id: &str) -> Result<bool, DbError> {
        Ok(self.users.remove(user_id.as_bytes())?.is_some())
    }

    /// Replace a user's stored collection with `store`
    ///
    /// Records are written in collection order under increasing sequence
    /// keys, so `load_files` returns them in the same order.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if encoding or any write fails.
    pub fn save_files(&self, user_id: &str, store: &FileStore) -> Result<(), DbError> {
        let tree = self.tree(TreeName::Files(user_id))?;
        write_sequence(&tree, store.iter())?;
        debug!(user = user_id, count = store.len(), "saved file collection");
        Ok(())
    }

    /// Load a user's collection; an unknown user has an empty one
    ///
    /// # Errors
    ///
    /// Returns `DbError` if decoding fails, or `DbError::Corrupt` if the
    /// stored records contain a duplicate id or an inconsistent record.
    pub fn load_files(&self, user_id: &str) -> Result<FileStore, DbError> {
        let name = TreeName::Files(user_id).name();
        let records: Vec<FileRecord> = read_sequence(&self.db.open_tree(&name)?, &name)?;
        FileStore::from_records(records).map_err(|e| match e {
            StoreError::DuplicateId(id) => DbError::Corrupt(format!("duplicate file id '{id}' in {name}")),
            other => DbError::Corrupt(format!("{other} in {name}")),
        })
    }

    /// Replace a user's stored share links
    ///
    /// # Errors
    ///
    /// Returns `DbError` if encoding or any write fails.
    pub fn save_shares(&self, user_id: &str, shares: &ShareRegistry) -> Result<(), DbError> {
        let tree = self.tree(TreeName::Shares(user_id))?;
        write_sequence(&tree, shares.list())?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DbError` if iteration or decoding fails.
    pub fn load_shares(&self, user_id: &str) -> Result<ShareRegistry, DbError> {
        let name = TreeName::Shares(user_id).name();
        let links: Vec<ShareLink> = read_sequence(&self.db.open_tree(&name)?, &name)?;
        Ok(ShareRegistry::from_links(links))
    }

    /// Drop a user's profile, collection and share links
    ///
    /// # Errors
    ///
    /// Returns `DbError` if any tree cannot be dropped.
    pub fn remove_user_data(&self, user_id: &str) -> Result<(), DbError> {
        self.db.drop_tree(TreeName::Files(user_id).name())?;
        self.db.drop_tree(TreeName::Shares(user_id).name())?;
        self.remove_user(user_id)?;
        if self.current_user_id()?.as_deref() == Some(user_id) {
            self.clear_current_user()?;
        }
        Ok(())
    }

    /// Flush all pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the flush operation fails.
    pub fn flush(&self) -> Result<(), DbError> {
        self.db.flush()?;
        Ok(())
    }

    fn tree(&self, name: TreeName<'_>) -> Result<Tree, DbError> {
        Ok(self.db.open_tree(name.name())?)
    }
}

fn write_sequence<'a, T, I>(tree: &Tree, items: I) -> Result<(), DbError>
where
    T: serde::Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut batch = Batch::default();
    let mut len = 0u64;
    for item in items {
        batch.insert(SeqKey(len).to_bytes().to_vec(), encode(item)?);
        len += 1;
    }
    // Stale keys go in the same batch as the new ones
    for key in tree.iter().keys() {
        let key = key?;
        if !SeqKey::from_bytes("", &key).is_ok_and(|SeqKey(seq)| seq < len) {
            batch.remove(key);
        }
    }
    tree.apply_batch(batch)?;
    Ok(())
}

fn read_sequence<T: serde::de::DeserializeOwned>(tree: &Tree, name: &str) -> Result<Vec<T>, DbError> {
    let mut items = Vec::new();
    for result in tree {
        let (key, value) = result?;
        SeqKey::from_bytes(name, &key)?;
        items.push(decode(&value)?);
    }
    Ok(items)
}

impl Drop for Database {
    fn drop(&mut self) {
        // Errors can't propagate from Drop; callers that need durability flush().
        let _ = self.db.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::ShareOptions;
    use crate::testing::{TestDb, at, record, user};

    #[test]
    fn test_open_creates_directory() {
        let test_db = TestDb::new();
        assert!(test_db.path().exists());
        assert_eq!(test_db.db().current_user_id().unwrap(), None);
        assert!(test_db.db().list_users().unwrap().is_empty());
    }

    #[test]
    fn test_current_user_round_trip() {
        let test_db = TestDb::new();
        let db = test_db.db();

        db.set_current_user("u1").unwrap();
        assert_eq!(db.current_user_id().unwrap().as_deref(), Some("u1"));

        db.clear_current_user().unwrap();
        assert_eq!(db.current_user_id().unwrap(), None);
    }

    #[test]
    fn test_users() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let alice = user("u1", "alice@example.com");

        db.save_user(&alice).unwrap();
        assert_eq!(db.get_user("u1").unwrap(), Some(alice.clone()));
        assert_eq!(db.find_user_by_email("ALICE@example.com").unwrap(), Some(alice));
        assert_eq!(db.get_user("nobody").unwrap(), None);

        assert!(db.remove_user("u1").unwrap());
        assert!(!db.remove_user("u1").unwrap());
    }

    #[test]
    fn test_files_keep_insertion_order() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let mut store = FileStore::new();
        for (id, name) in [("z", "Zeta.txt"), ("a", "Alpha.txt"), ("m", "Mid.txt")] {
            store.insert(record(id, name, 1)).unwrap();
        }
        db.save_files("u1", &store).unwrap();

        let loaded = db.load_files("u1").unwrap();
        let names: Vec<&str> = loaded.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta.txt", "Alpha.txt", "Mid.txt"]);
    }

    #[test]
    fn test_save_files_replaces_previous_contents() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let mut store = FileStore::new();
        store.insert(record("1", "a.txt", 1)).unwrap();
        store.insert(record("2", "b.txt", 1)).unwrap();
        db.save_files("u1", &store).unwrap();

        store.permanent_delete(&"1".into()).unwrap();
        db.save_files("u1", &store).unwrap();

        let loaded = db.load_files("u1").unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.get(&"2".into()).is_some());
    }

    #[test]
    fn test_files_are_per_user() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let mut store = FileStore::new();
        store.insert(record("1", "a.txt", 1)).unwrap();
        db.save_files("u1", &store).unwrap();

        assert!(db.load_files("u2").unwrap().is_empty());
    }

    #[test]
    fn test_shares_round_trip() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let mut shares = ShareRegistry::new();
        shares.create(&record("1", "a.txt", 1), ShareOptions::default(), at(2024, 1, 1));
        shares.create(&record("2", "b.txt", 1), ShareOptions::default().with_expiry_days(7), at(2024, 1, 1));
        db.save_shares("u1", &shares).unwrap();

        assert_eq!(db.load_shares("u1").unwrap(), shares);
    }

    #[test]
    fn test_remove_user_data() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let mut store = FileStore::new();
        store.insert(record("1", "a.txt", 1)).unwrap();
        db.save_user(&user("u1", "a@example.com")).unwrap();
        db.save_files("u1", &store).unwrap();
        db.set_current_user("u1").unwrap();

        db.remove_user_data("u1").unwrap();

        assert_eq!(db.get_user("u1").unwrap(), None);
        assert!(db.load_files("u1").unwrap().is_empty());
        assert_eq!(db.current_user_id().unwrap(), None);
    }

    #[test]
    fn test_reopen_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db");

        {
            let db = Database::open(&path).unwrap();
            let mut store = FileStore::new();
            store.insert(record("1", "persistent.txt", 5)).unwrap();
            db.save_files("u1", &store).unwrap();
            db.set_current_user("u1").unwrap();
            db.flush().unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.current_user_id().unwrap().as_deref(), Some("u1"));
        assert_eq!(db.load_files("u1").unwrap().len(), 1);
    }

    #[test]
    fn test_shorter_save_drops_trailing_keys() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let long = FileStore::from_records((1..=4).map(|i| record(&i.to_string(), "f.txt", 1))).unwrap();
        db.save_files("u1", &long).unwrap();
        let tree = db.tree(TreeName::Files("u1")).unwrap();
        assert_eq!(tree.len(), 4);

        let short = FileStore::from_records([record("9", "only.txt", 1)]).unwrap();
        db.save_files("u1", &short).unwrap();

        assert_eq!(tree.len(), 1);
        assert!(tree.get(SeqKey(0).to_bytes()).unwrap().is_some());
        assert!(tree.get(SeqKey(1).to_bytes()).unwrap().is_none());
        let loaded = db.load_files("u1").unwrap();
        assert_eq!(loaded.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), ["9"]);
    }

    #[test]
    fn test_saving_empty_collection_empties_tree() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let store = FileStore::from_records([record("1", "a.txt", 1), record("2", "b.txt", 1)]).unwrap();
        db.save_files("u1", &store).unwrap();
        db.save_files("u1", &FileStore::new()).unwrap();

        assert!(db.load_files("u1").unwrap().is_empty());
    }

    #[test]
    fn test_load_rejects_inconsistent_record() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let mut bad = record("1", "a.txt", 1);
        bad.is_deleted = true;
        let tree = db.tree(TreeName::Files("u1")).unwrap();
        tree.insert(SeqKey(0).to_bytes(), encode(&bad).unwrap()).unwrap();

        let err = db.load_files("u1").unwrap_err();
        assert!(matches!(err, DbError::Corrupt(ref msg) if msg.contains("Invalid record 1")));
    }
}

//! Share links
//!
//! A `ShareRegistry` keeps one user's share links in creation order. Each
//! link points at a single file by id and carries its own access rules.
//! Keeping the file record's public flag in step with the registry is the
//! session's job (see `Session::share_file`).

use crate::store::{FileId, FileRecord};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::debug;

pub mod error;
pub mod types;

pub use error::ShareError;
pub use types::{ShareAccess, ShareLink, ShareOptions};

type Result<T> = std::result::Result<T, ShareError>;

const TOKEN_LEN: usize = 16;

/// Generate a random alphanumeric share token
#[must_use]
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// One user's share links
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareRegistry {
    links: Vec<ShareLink>,
}

impl ShareRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self { links: Vec::new() }
    }

    #[must_use]
    pub const fn from_links(links: Vec<ShareLink>) -> Self {
        Self { links }
    }

    /// Create a link for `file`
    pub fn create(&mut self, file: &FileRecord, options: ShareOptions, now: DateTime<Utc>) -> &ShareLink {
        let mut token = generate_token();
        while self.by_token(&token).is_some() {
            token = generate_token();
        }

        let link = ShareLink {
            id: uuid::Uuid::new_v4().to_string(),
            token,
            file_id: file.id.clone(),
            file_name: file.name.clone(),
            expires_at: options.expires_at(now),
            created_at: now,
            access_count: 0,
            options,
        };
        debug!(file = %link.file_id, link = %link.id, "created share link");
        self.links.push(link);
        &self.links[self.links.len() - 1]
    }

    /// All links in creation order
    pub fn list(&self) -> impl Iterator<Item = &ShareLink> {
        self.links.iter()
    }

    /// Links pointing at `file_id`, in creation order
    pub fn list_for_file<'a>(&'a self, file_id: &'a FileId) -> impl Iterator<Item = &'a ShareLink> {
        self.links.iter().filter(move |l| &l.file_id == file_id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ShareLink> {
        self.links.iter().find(|l| l.id == id)
    }

    #[must_use]
    pub fn by_token(&self, token: &str) -> Option<&ShareLink> {
        self.links.iter().find(|l| l.token == token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Replace a link's options; expiry is recomputed from `now`
    ///
    /// # Errors
    ///
    /// Returns `ShareError::NotFound` if no link has this id.
    pub fn update(&mut self, id: &str, options: ShareOptions, now: DateTime<Utc>) -> Result<&ShareLink> {
        let link = self
            .links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| ShareError::NotFound(id.to_string()))?;
        link.expires_at = options.expires_at(now);
        link.options = options;
        Ok(&*link)
    }

    /// Remove a link by id
    ///
    /// # Errors
    ///
    /// Returns `ShareError::NotFound` if no link has this id.
    pub fn delete(&mut self, id: &str) -> Result<ShareLink> {
        let index = self
            .links
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| ShareError::NotFound(id.to_string()))?;
        Ok(self.links.remove(index))
    }

    /// Remove every link pointing at `file_id`, returning how many were removed
    pub fn delete_for_file(&mut self, file_id: &FileId) -> usize {
        let before = self.links.len();
        self.links.retain(|l| &l.file_id != file_id);
        before - self.links.len()
    }

    /// Open a link as a recipient
    ///
    /// Counts the access on success.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::NotFound` for an unknown token, `Expired` once the
    /// link's expiry has passed, `SignInRequired` when the link demands a
    /// signed-in recipient, and `PasswordRequired` / `InvalidPassword` for
    /// protected links.
    pub fn access(
        &mut self,
        token: &str,
        password: Option<&str>,
        signed_in: bool,
        now: DateTime<Utc>,
    ) -> Result<ShareAccess> {
        let link = self
            .links
            .iter_mut()
            .find(|l| l.token == token)
            .ok_or_else(|| ShareError::NotFound(token.to_string()))?;

        if link.is_expired(now) {
            return Err(ShareError::Expired(token.to_string()));
        }
        if link.options.require_sign_in && !signed_in {
            return Err(ShareError::SignInRequired);
        }
        if link.options.has_password() {
            match password {
                None => return Err(ShareError::PasswordRequired),
                Some(p) if !link.options.check_password(p) => {
                    return Err(ShareError::InvalidPassword);
                }
                Some(_) => {}
            }
        }

        link.access_count += 1;
        Ok(ShareAccess {
            file_id: link.file_id.clone(),
            file_name: link.file_name.clone(),
            can_download: link.options.allow_download,
            can_preview: link.options.allow_preview,
        })
    }
}

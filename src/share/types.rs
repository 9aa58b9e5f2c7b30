//! Share link records and options

use crate::store::FileId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Access rules attached to a share link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareOptions {
    /// SHA-256 hex digest of the link password
    pub password_hash: Option<String>,
    /// Lifetime of the link; `None` never expires
    pub expiry_days: Option<u32>,
    pub allow_download: bool,
    pub allow_preview: bool,
    pub require_sign_in: bool,
}

impl Default for ShareOptions {
    fn default() -> Self {
        Self {
            password_hash: None,
            expiry_days: None,
            allow_download: true,
            allow_preview: true,
            require_sign_in: false,
        }
    }
}

impl ShareOptions {
    #[must_use]
    pub fn with_password(mut self, password: &str) -> Self {
        self.password_hash = Some(hash_password(password));
        self
    }

    #[must_use]
    pub const fn with_expiry_days(mut self, days: u32) -> Self {
        self.expiry_days = Some(days);
        self
    }

    #[must_use]
    pub const fn allow_download(mut self, allow: bool) -> Self {
        self.allow_download = allow;
        self
    }

    #[must_use]
    pub const fn allow_preview(mut self, allow: bool) -> Self {
        self.allow_preview = allow;
        self
    }

    #[must_use]
    pub const fn require_sign_in(mut self, require: bool) -> Self {
        self.require_sign_in = require;
        self
    }

    #[must_use]
    pub const fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Expiry instant for a link created (or updated) at `from`
    #[must_use]
    pub fn expires_at(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expiry_days
            .map(|days| from + Duration::days(i64::from(days)))
    }

    #[must_use]
    pub fn check_password(&self, candidate: &str) -> bool {
        self.password_hash
            .as_deref()
            .is_some_and(|hash| hash == hash_password(candidate))
    }
}

fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// A shareable link to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    pub id: String,
    pub token: String,
    pub file_id: FileId,
    pub file_name: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub access_count: u64,
    pub options: ShareOptions,
}

impl ShareLink {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Relative URL path a recipient opens
    #[must_use]
    pub fn path(&self) -> String {
        format!("/share/{}", self.token)
    }
}

/// What a recipient may do with a shared file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareAccess {
    pub file_id: FileId,
    pub file_name: String,
    pub can_download: bool,
    pub can_preview: bool,
}

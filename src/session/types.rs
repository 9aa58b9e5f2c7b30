//! Session data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default per-user quota: 15 GiB
pub const DEFAULT_STORAGE_LIMIT: u64 = 15 * 1024 * 1024 * 1024;

/// A signed-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub display_name: Option<String>,
    pub image: Option<String>,
    /// Quota in bytes
    pub storage_limit: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with a fresh random id and the default quota
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            display_name: None,
            image: None,
            storage_limit: DEFAULT_STORAGE_LIMIT,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name shown in listings: the display name when set, else the account name
    #[must_use]
    pub fn shown_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// Profile fields a user may change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub image: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.display_name.is_none() && self.image.is_none()
    }
}

/// Storage consumed by one user
///
/// Trashed files still occupy space until they are purged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUsage {
    pub active: u64,
    pub trashed: u64,
    pub limit: u64,
    /// Active bytes per MIME category key
    pub breakdown: BTreeMap<&'static str, u64>,
}

impl StorageUsage {
    #[must_use]
    pub const fn used(&self) -> u64 {
        self.active + self.trashed
    }

    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used())
    }

    /// Whole-number percentage of the quota in use, capped at 100
    #[must_use]
    pub fn percent_used(&self) -> u8 {
        if self.limit == 0 {
            return 100;
        }
        let percent = (u128::from(self.used()) * 100 / u128::from(self.limit)).min(100);
        u8::try_from(percent).unwrap_or(100)
    }

    /// Whether `additional` more bytes fit in the quota
    #[must_use]
    pub const fn fits(&self, additional: u64) -> bool {
        additional <= self.remaining()
    }
}

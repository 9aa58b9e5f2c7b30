//! Trash retention calculation
//!
//! Trashed files stay recoverable for a configured number of days. These
//! helpers compute how much of that window is left. Purging expired records
//! is driven from outside (see `FileStore::purge_expired` and the
//! `trash sweep` command); nothing here runs on a timer.

use chrono::{DateTime, Utc};
use std::fmt;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Whole days left before a trashed record becomes eligible for purge
///
/// Computes `ceil((deleted_at + retention_days - now) / 1 day)` with
/// millisecond precision. Returns zero on the last day and a negative
/// value once the window has elapsed.
#[must_use]
pub fn days_remaining(deleted_at: DateTime<Utc>, retention_days: u32, now: DateTime<Utc>) -> i64 {
    let expires_ms = deleted_at.timestamp_millis() + i64::from(retention_days) * DAY_MS;
    let remaining_ms = expires_ms - now.timestamp_millis();
    // ceil for a positive divisor
    -((-remaining_ms).div_euclid(DAY_MS))
}

/// Whether the retention window for a record deleted at `deleted_at` has passed
#[must_use]
pub fn is_expired(deleted_at: DateTime<Utc>, retention_days: u32, now: DateTime<Utc>) -> bool {
    days_remaining(deleted_at, retention_days, now) < 0
}

/// Display state of a trashed record's retention window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Recoverable for this many more days
    InDays(i64),
    /// Last day of the window
    Today,
    /// Window has elapsed; eligible for purge
    Expired,
}

impl Expiry {
    #[must_use]
    pub const fn from_days(days: i64) -> Self {
        if days > 0 {
            Self::InDays(days)
        } else if days == 0 {
            Self::Today
        } else {
            Self::Expired
        }
    }

    #[must_use]
    pub fn compute(deleted_at: DateTime<Utc>, retention_days: u32, now: DateTime<Utc>) -> Self {
        Self::from_days(days_remaining(deleted_at, retention_days, now))
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InDays(1) => write!(f, "Expires in 1 day"),
            Self::InDays(days) => write!(f, "Expires in {days} days"),
            Self::Today => write!(f, "Expires today"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

//! Query engine for file collections
//!
//! A pure function from a sequence of records and a `FilterSpec` to an
//! ordered view. The input is never mutated and no state is kept between
//! calls.
//!
//! Steps, in order:
//! 1. keep records whose name contains `search` (case-insensitive)
//! 2. keep records in the selected MIME category (unknown keys pass through)
//! 3. stable sort by the selected key (ties keep their input order)
//! 4. reverse for descending order
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use permidrive::query::{query, FilterSpec, SortKey, SortOrder};
//! use permidrive::store::{FileId, FileRecord};
//!
//! let now = Utc::now();
//! let files = vec![
//!     FileRecord::new(FileId::new("1"), "b.txt", 10, "text/plain", "u1", now),
//!     FileRecord::new(FileId::new("2"), "a.txt", 20, "text/plain", "u1", now),
//! ];
//! let spec = FilterSpec::default().sort(SortKey::Name, SortOrder::Asc);
//! let view = query(&files, &spec);
//! assert_eq!(view[0].name, "a.txt");
//! ```

use crate::store::FileRecord;
use std::cmp::Ordering;

pub mod types;

pub use types::{FilterSpec, MimeFilter, SortKey, SortOrder};

/// Compute the filtered, ordered view of `records`
pub fn query<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a FileRecord>
where
    I: IntoIterator<Item = &'a FileRecord>,
{
    let needle = spec.search.to_lowercase();

    let mut view: Vec<&FileRecord> = records
        .into_iter()
        .filter(|r| needle.is_empty() || r.name.to_lowercase().contains(&needle))
        .filter(|r| spec.mime_type.matches(&r.mime_type))
        .collect();

    if let Some(key) = spec.sort_by {
        // sort_by is stable
        view.sort_by(|a, b| compare(a, b, key));
        if spec.sort_order == SortOrder::Desc {
            view.reverse();
        }
    }

    view
}

fn compare(a: &FileRecord, b: &FileRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Size => a.size.cmp(&b.size),
        SortKey::Date => a.updated_at.cmp(&b.updated_at),
        SortKey::Type => a.mime_type.to_lowercase().cmp(&b.mime_type.to_lowercase()),
    }
}

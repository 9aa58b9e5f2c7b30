//! Filter and sort parameters for the query engine
//!
//! Parsing from strings is deliberately lenient: an unknown category or sort
//! key never fails, it degrades to pass-through behaviour.

use crate::mime::MimeCategory;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field used to order query results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Display name, case-insensitive
    Name,
    /// Byte size
    Size,
    /// Last update time
    #[default]
    Date,
    /// MIME type, case-insensitive
    Type,
}

impl SortKey {
    /// Parse a sort key, returning `None` for unrecognised input
    #[must_use]
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "size" => Some(Self::Size),
            "date" => Some(Self::Date),
            "type" => Some(Self::Type),
            _ => None,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Date => "date",
            Self::Type => "type",
        };
        f.write_str(s)
    }
}

/// Direction of the sort
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse a direction; anything other than `desc` is ascending
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// MIME category restriction for a query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MimeFilter {
    /// No restriction
    #[default]
    All,
    /// Only records whose type belongs to the category
    Category(MimeCategory),
    /// Unrecognised category key; matches everything
    Unknown(String),
}

impl MimeFilter {
    /// Parse a category key; `"all"` or an empty string means no restriction
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let key = s.trim();
        if key.is_empty() || key.eq_ignore_ascii_case("all") {
            return Self::All;
        }
        key.parse::<MimeCategory>()
            .map_or_else(|_| Self::Unknown(key.to_string()), Self::Category)
    }

    /// Whether a record with this MIME type passes the filter
    #[must_use]
    pub fn matches(&self, mime_type: &str) -> bool {
        match self {
            Self::All | Self::Unknown(_) => true,
            Self::Category(category) => category.contains(mime_type),
        }
    }
}

impl fmt::Display for MimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Category(category) => write!(f, "{category}"),
            Self::Unknown(key) => f.write_str(key),
        }
    }
}

/// Caller-supplied search and sort criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Case-insensitive substring matched against names; empty matches all
    pub search: String,
    pub mime_type: MimeFilter,
    /// `None` keeps the input order
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search: String::new(),
            mime_type: MimeFilter::All,
            sort_by: Some(SortKey::Date),
            sort_order: SortOrder::Desc,
        }
    }
}

impl FilterSpec {
    /// Build a filter from raw string inputs, degrading unknown values
    #[must_use]
    pub fn from_strs(search: &str, mime_type: &str, sort_by: &str, sort_order: &str) -> Self {
        Self {
            search: search.to_string(),
            mime_type: MimeFilter::parse(mime_type),
            sort_by: SortKey::parse_lenient(sort_by),
            sort_order: SortOrder::parse_lenient(sort_order),
        }
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn mime_type(mut self, filter: MimeFilter) -> Self {
        self.mime_type = filter;
        self
    }

    #[must_use]
    pub const fn sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_by = Some(key);
        self.sort_order = order;
        self
    }
}

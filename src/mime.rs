//! MIME type catalogue
//!
//! Groups MIME type strings into the coarse categories used for filtering
//! and for the storage breakdown. The mapping is fixed.

use crate::store::FileRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Category key for types that belong to no known category
pub const OTHER: &str = "other";

/// Coarse grouping of MIME types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeCategory {
    Images,
    Documents,
    Spreadsheets,
    Presentations,
    Videos,
    Audio,
    Archives,
    Code,
}

impl MimeCategory {
    /// All categories in lookup order
    pub const ALL: [Self; 8] = [
        Self::Images,
        Self::Documents,
        Self::Spreadsheets,
        Self::Presentations,
        Self::Videos,
        Self::Audio,
        Self::Archives,
        Self::Code,
    ];

    /// Key used on the command line and in configuration
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Documents => "documents",
            Self::Spreadsheets => "spreadsheets",
            Self::Presentations => "presentations",
            Self::Videos => "videos",
            Self::Audio => "audio",
            Self::Archives => "archives",
            Self::Code => "code",
        }
    }

    /// MIME types that belong to this category
    #[must_use]
    pub const fn types(self) -> &'static [&'static str] {
        match self {
            Self::Images => &[
                "image/jpeg",
                "image/jpg",
                "image/png",
                "image/gif",
                "image/webp",
                "image/svg+xml",
                "image/bmp",
                "image/tiff",
                "image/ico",
            ],
            Self::Documents => &[
                "application/pdf",
                "application/msword",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "application/vnd.oasis.opendocument.text",
                "text/plain",
                "text/rtf",
            ],
            Self::Spreadsheets => &[
                "application/vnd.ms-excel",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "application/vnd.oasis.opendocument.spreadsheet",
                "text/csv",
            ],
            Self::Presentations => &[
                "application/vnd.ms-powerpoint",
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                "application/vnd.oasis.opendocument.presentation",
            ],
            Self::Videos => &[
                "video/mp4",
                "video/avi",
                "video/mov",
                "video/wmv",
                "video/flv",
                "video/webm",
                "video/mkv",
            ],
            Self::Audio => &[
                "audio/mp3",
                "audio/mpeg",
                "audio/wav",
                "audio/ogg",
                "audio/aac",
                "audio/flac",
                "audio/m4a",
            ],
            Self::Archives => &[
                "application/zip",
                "application/x-rar-compressed",
                "application/x-7z-compressed",
                "application/x-tar",
                "application/gzip",
            ],
            Self::Code => &[
                "text/javascript",
                "text/typescript",
                "text/html",
                "text/css",
                "application/json",
                "text/xml",
                "application/xml",
            ],
        }
    }

    #[must_use]
    pub fn contains(self, mime_type: &str) -> bool {
        self.types().contains(&mime_type)
    }

    /// First category whose type list contains `mime_type`
    #[must_use]
    pub fn of(mime_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.contains(mime_type))
    }
}

impl fmt::Display for MimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MimeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("unknown MIME category '{s}'"))
    }
}

/// Category key for a MIME type, `"other"` when uncategorised
#[must_use]
pub fn category_of(mime_type: &str) -> &'static str {
    MimeCategory::of(mime_type).map_or(OTHER, MimeCategory::key)
}

/// Group records by their category key
pub fn group_by_category<'a, I>(records: I) -> BTreeMap<&'static str, Vec<&'a FileRecord>>
where
    I: IntoIterator<Item = &'a FileRecord>,
{
    let mut grouped: BTreeMap<&'static str, Vec<&'a FileRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry(category_of(&record.mime_type))
            .or_default()
            .push(record);
    }
    grouped
}

/// Short glyph for a MIME type in listings
#[must_use]
pub fn icon_for(mime_type: &str) -> &'static str {
    match MimeCategory::of(mime_type) {
        Some(MimeCategory::Images) => "🖼️",
        Some(MimeCategory::Documents) => "📄",
        Some(MimeCategory::Spreadsheets) => "📊",
        Some(MimeCategory::Presentations) => "📽️",
        Some(MimeCategory::Videos) => "🎥",
        Some(MimeCategory::Audio) => "🎵",
        Some(MimeCategory::Archives) => "📦",
        Some(MimeCategory::Code) => "📝",
        None => "📁",
    }
}

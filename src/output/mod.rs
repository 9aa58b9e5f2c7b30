//! Output formatting for CLI display
//!
//! Builds the one-line renderings of files, trash entries and share links
//! printed by the commands. In quiet mode each line collapses to the bare
//! identifier so output can be piped.

use crate::session::{StorageUsage, User};
use crate::share::ShareLink;
use crate::store::FileRecord;
use crate::trash::Expiry;
use crate::upload::{UploadProgress, UploadStatus};
use byte_unit::{Byte, UnitType};
use chrono::{DateTime, Utc};
use colored::Colorize;

/// Human-readable binary size, e.g. `2.5 MiB`
#[must_use]
pub fn human_size(bytes: u64) -> String {
    let adjusted = Byte::from_u64(bytes).get_appropriate_unit(UnitType::Binary);
    format!("{adjusted:.1}")
}

/// Calendar date used in listings
#[must_use]
pub fn short_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Format an active file for `list`
#[must_use]
pub fn file_line(record: &FileRecord, quiet: bool) -> String {
    if quiet {
        return record.id.to_string();
    }
    let shared = if record.is_public {
        format!(" {}", "[shared]".cyan())
    } else {
        String::new()
    };
    format!(
        "  {} {}  {}  {}  {}{}",
        crate::mime::icon_for(&record.mime_type),
        record.name.bold(),
        human_size(record.size).dimmed(),
        short_date(record.updated_at).dimmed(),
        record.id.as_str().dimmed(),
        shared
    )
}

/// Format a trashed file with its remaining retention
#[must_use]
pub fn trash_line(record: &FileRecord, retention_days: u32, now: DateTime<Utc>, quiet: bool) -> String {
    if quiet {
        return record.id.to_string();
    }
    let label = match record.deleted_at.map(|at| Expiry::compute(at, retention_days, now)) {
        Some(Expiry::Expired) => Expiry::Expired.to_string().red(),
        Some(expiry @ Expiry::InDays(days)) if days > 7 => expiry.to_string().normal(),
        Some(expiry) => expiry.to_string().yellow(),
        None => "".normal(),
    };
    format!(
        "  {} {}  {}  {}  {}",
        crate::mime::icon_for(&record.mime_type),
        record.name,
        human_size(record.size).dimmed(),
        label,
        record.id.as_str().dimmed()
    )
}

/// Format a share link
#[must_use]
pub fn share_line(link: &ShareLink, now: DateTime<Utc>, quiet: bool) -> String {
    if quiet {
        return link.token.clone();
    }
    let expires = match link.expires_at {
        Some(_) if link.is_expired(now) => "expired".red().to_string(),
        Some(at) => format!("expires {}", short_date(at)),
        None => "never expires".to_string(),
    };
    let mut flags = Vec::new();
    if link.options.has_password() {
        flags.push("password");
    }
    if link.options.require_sign_in {
        flags.push("sign-in");
    }
    if !link.options.allow_download {
        flags.push("no-download");
    }
    if !link.options.allow_preview {
        flags.push("no-preview");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };
    format!(
        "  {}  {}  {}, {} views{}  {}",
        link.file_name.bold(),
        link.path().cyan(),
        expires,
        link.access_count,
        flags,
        link.id.dimmed()
    )
}

/// Format one upload result
#[must_use]
pub fn upload_line(progress: &UploadProgress) -> String {
    match progress.status {
        UploadStatus::Completed => format!("{} {}", "✓".green(), progress.file_name),
        UploadStatus::Uploading => format!("… {} ({}%)", progress.file_name, progress.progress),
        UploadStatus::Error => format!(
            "{} {}: {}",
            "✗".red(),
            progress.file_name,
            progress.error.as_deref().unwrap_or("Upload failed")
        ),
    }
}

/// Profile details for `whoami` and `profile`
#[must_use]
pub fn profile_lines(user: &User) -> Vec<String> {
    let mut lines = vec![format!("{} <{}>", user.shown_name().bold(), user.email)];
    if user.display_name.is_some() {
        lines.push(format!("  Name:    {}", user.name));
    }
    if let Some(image) = &user.image {
        lines.push(format!("  Avatar:  {image}"));
    }
    lines.push(format!("  Quota:   {}", human_size(user.storage_limit)));
    lines.push(format!("  Since:   {}", short_date(user.created_at)));
    lines.push(format!("  Id:      {}", user.id.dimmed()));
    lines
}

/// Storage summary lines for the `storage` command
#[must_use]
pub fn storage_summary(usage: &StorageUsage) -> Vec<String> {
    let percent = usage.percent_used();
    let percent_text = format!("{percent}%");
    let percent_text = if percent >= 90 {
        percent_text.red()
    } else if percent >= 75 {
        percent_text.yellow()
    } else {
        percent_text.green()
    };

    let mut lines = vec![
        format!(
            "{} of {} used ({})",
            human_size(usage.used()),
            human_size(usage.limit),
            percent_text
        ),
        format!("  Files: {}", human_size(usage.active)),
        format!("  Trash: {}", human_size(usage.trashed)),
    ];
    for (category, bytes) in &usage.breakdown {
        lines.push(format!("    {category}: {}", human_size(*bytes)));
    }
    lines
}

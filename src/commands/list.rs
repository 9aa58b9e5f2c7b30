//! List command - show the active files, filtered and sorted

use super::{Context, count};
use crate::cli::FilterArgs;
use crate::output;
use crate::query::{self, MimeFilter};
use crate::session::Session;
use crate::DriveError;
use tracing::warn;

type Result<T> = std::result::Result<T, DriveError>;

/// Execute the list command
///
/// # Errors
/// Returns an error if not signed in or the database cannot be read
pub fn execute(ctx: &Context, filter: &FilterArgs) -> Result<()> {
    let session = Session::require(ctx.db)?;
    let spec = filter.to_spec(&ctx.config.view);
    if let MimeFilter::Unknown(key) = &spec.mime_type {
        warn!(category = %key, "unknown file type filter; showing all types");
    }

    let files = query::query(session.files.list_active(), &spec);
    if files.is_empty() {
        if !ctx.quiet {
            if spec.search.is_empty() && spec.mime_type == MimeFilter::All {
                println!("No files yet. Upload some with 'permidrive upload <FILE>...'");
            } else {
                println!("No files match.");
            }
        }
        return Ok(());
    }

    if !ctx.quiet {
        println!(
            "{} ({}, by {} {})",
            session.user.shown_name(),
            count(files.len(), "file"),
            spec.sort_by.map_or_else(|| "upload order".to_string(), |k| k.to_string()),
            spec.sort_order
        );
    }
    for record in files {
        println!("{}", output::file_line(record, ctx.quiet));
    }
    Ok(())
}

//! Storage command - quota usage with a per-category breakdown

use super::Context;
use crate::DriveError;
use crate::output;
use crate::session::Session;

type Result<T> = std::result::Result<T, DriveError>;

/// Execute the storage command
///
/// Quiet mode prints `used limit` in bytes.
///
/// # Errors
/// Returns an error if not signed in
pub fn execute(ctx: &Context) -> Result<()> {
    let session = Session::require(ctx.db)?;
    let usage = session.storage_usage();
    if ctx.quiet {
        println!("{} {}", usage.used(), usage.limit);
        return Ok(());
    }
    for line in output::storage_summary(&usage) {
        println!("{line}");
    }
    Ok(())
}

//! Trash command - list, purge, empty and sweep trashed files

use super::{Context, count};
use crate::DriveError;
use crate::cli::{FilterArgs, TrashCommands};
use crate::output;
use crate::query;
use crate::session::Session;
use crate::store::FileId;

type Result<T> = std::result::Result<T, DriveError>;

/// Execute a trash subcommand
///
/// # Errors
/// Returns an error if not signed in, an id is not in the trash, or the
/// session cannot be saved
pub fn execute(ctx: &Context, command: Option<&TrashCommands>) -> Result<()> {
    let command = TrashCommands::or_default(command.cloned());
    match &command {
        TrashCommands::List { filter } => list(ctx, filter),
        TrashCommands::Purge { ids } => purge(ctx, ids),
        TrashCommands::Empty => empty(ctx),
        TrashCommands::Sweep => sweep(ctx),
    }
}

fn list(ctx: &Context, filter: &FilterArgs) -> Result<()> {
    let session = Session::require(ctx.db)?;
    let spec = filter.to_spec(&ctx.config.view);
    let trashed = query::query(session.files.list_trashed(), &spec);
    let retention = ctx.config.storage.trash_retention_days;

    if trashed.is_empty() {
        ctx.info("Trash is empty.");
        return Ok(());
    }
    if !ctx.quiet {
        println!(
            "Trash ({}, {}). Items are deleted after {retention} days.",
            count(trashed.len(), "file"),
            output::human_size(session.files.trashed_size())
        );
    }
    for record in trashed {
        println!("{}", output::trash_line(record, retention, ctx.now, ctx.quiet));
    }
    Ok(())
}

fn purge(ctx: &Context, ids: &[String]) -> Result<()> {
    let mut session = Session::require(ctx.db)?;
    let mut unique: Vec<FileId> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = FileId::new(id.as_str());
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    let ids = unique;
    for id in &ids {
        match session.files.get(id) {
            Some(record) if record.is_deleted => {}
            Some(_) => {
                return Err(DriveError::InvalidInput(format!(
                    "{id} is not in the trash; use 'delete --permanent' instead"
                )));
            }
            None => return Err(crate::store::StoreError::NotFound(id.clone()).into()),
        }
    }

    let prompt = format!("Permanently delete {}? This cannot be undone", count(ids.len(), "file"));
    if !ctx.confirm(&prompt)? {
        ctx.info("Cancelled.");
        return Ok(());
    }
    for id in &ids {
        session.permanent_delete(id)?;
    }
    session.save(ctx.db)?;
    ctx.info(format!("Permanently deleted {}", count(ids.len(), "file")));
    Ok(())
}

fn empty(ctx: &Context) -> Result<()> {
    let mut session = Session::require(ctx.db)?;
    let trashed = session.files.list_trashed().count();
    if trashed == 0 {
        ctx.info("Trash is already empty.");
        return Ok(());
    }
    let prompt = format!("Permanently delete {} in the trash?", count(trashed, "file"));
    if !ctx.confirm(&prompt)? {
        ctx.info("Cancelled.");
        return Ok(());
    }
    let removed = session.empty_trash();
    session.save(ctx.db)?;
    ctx.info(format!(
        "Emptied trash: {} freed",
        output::human_size(removed.iter().map(|r| r.size).sum())
    ));
    Ok(())
}

fn sweep(ctx: &Context) -> Result<()> {
    let mut session = Session::require(ctx.db)?;
    let removed = session.sweep_trash(ctx.config.storage.trash_retention_days, ctx.now);
    if !removed.is_empty() {
        session.save(ctx.db)?;
    }
    if ctx.quiet {
        for record in &removed {
            println!("{}", record.id);
        }
    } else {
        println!("Removed {} past the retention period", count(removed.len(), "expired file"));
    }
    Ok(())
}

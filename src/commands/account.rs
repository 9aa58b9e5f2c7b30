//! Account commands - sign in, sign out, profile, export and deletion

use super::{Context, count};
use crate::DriveError;
use crate::cli::AccountCommands;
use crate::output;
use crate::session::{ProfileUpdate, Session, User};
use colored::Colorize;
use std::fs;
use std::path::Path;

type Result<T> = std::result::Result<T, DriveError>;

/// Sign in with `email`, creating the account on first use
///
/// Signing in as someone else while a session is open saves that session
/// first.
///
/// # Errors
/// Returns an error if the email is invalid or the database fails
pub fn signin(ctx: &Context, email: &str, name: Option<&str>) -> Result<()> {
    let email = email.trim();
    if let Some(current) = Session::resume(ctx.db)? {
        if current.user.email.eq_ignore_ascii_case(email) {
            ctx.info(format!("Already signed in as {}", current.user.email));
            return Ok(());
        }
        current.sign_out(ctx.db)?;
    }

    let (user, created) = match ctx.db.find_user_by_email(email)? {
        Some(user) => (user, false),
        None => {
            let name = name
                .map(str::to_string)
                .unwrap_or_else(|| default_name(email));
            (User::new(name, email, ctx.now), true)
        }
    };

    let session = Session::sign_in(ctx.db, user)?;
    if ctx.quiet {
        println!("{}", session.user.id);
    } else if created {
        println!("Created account for {}", session.user.email.bold());
    } else {
        println!(
            "Signed in as {} ({})",
            session.user.shown_name().bold(),
            count(session.files.list_active().count(), "file")
        );
    }
    Ok(())
}

fn default_name(email: &str) -> String {
    email
        .split_once('@')
        .map_or(email, |(local, _)| local)
        .to_string()
}

/// # Errors
/// Returns an error if the session cannot be saved
pub fn signout(ctx: &Context) -> Result<()> {
    let Some(session) = Session::resume(ctx.db)? else {
        ctx.info("Not signed in.");
        return Ok(());
    };
    let user = session.sign_out(ctx.db)?;
    ctx.info(format!("Signed out {}", user.email));
    Ok(())
}

/// # Errors
/// Returns an error if the database cannot be read
pub fn whoami(ctx: &Context) -> Result<()> {
    match Session::resume(ctx.db)? {
        Some(session) if ctx.quiet => println!("{}", session.user.email),
        Some(session) => {
            for line in output::profile_lines(&session.user) {
                println!("{line}");
            }
        }
        None => ctx.info("Not signed in."),
    }
    Ok(())
}

/// Show the profile, or apply the given changes
///
/// # Errors
/// Returns an error if not signed in or the new name is blank
pub fn profile(ctx: &Context, update: ProfileUpdate) -> Result<()> {
    let mut session = Session::require(ctx.db)?;
    if update.is_empty() {
        for line in output::profile_lines(&session.user) {
            println!("{line}");
        }
        return Ok(());
    }

    session.update_profile(update, ctx.now)?;
    session.save(ctx.db)?;
    ctx.info("Profile updated.");
    if !ctx.quiet {
        for line in output::profile_lines(&session.user) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Execute an account subcommand
///
/// # Errors
/// Returns an error if not signed in, the export cannot be written, or the
/// database fails
pub fn execute(ctx: &Context, command: &AccountCommands) -> Result<()> {
    match command {
        AccountCommands::Export { output } => export(ctx, output.as_deref()),
        AccountCommands::Delete => delete(ctx),
    }
}

fn export(ctx: &Context, path: Option<&Path>) -> Result<()> {
    let session = Session::require(ctx.db)?;
    let json = session.export()?;
    match path {
        Some(path) => {
            fs::write(path, json)?;
            ctx.info(format!("Exported account data to {}", path.display()));
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn delete(ctx: &Context) -> Result<()> {
    let session = Session::require(ctx.db)?;
    let prompt = format!(
        "Delete account {} and all {}? This cannot be undone",
        session.user.email,
        count(session.files.len(), "file")
    );
    if !ctx.confirm(&prompt)? {
        ctx.info("Cancelled.");
        return Ok(());
    }
    let user = session.delete_account(ctx.db)?;
    ctx.info(format!("Deleted account {}", user.email));
    Ok(())
}

//! Share command - create, list, update, revoke and open share links

use super::{Context, count};
use crate::DriveError;
use crate::cli::{ShareCommands, normalize_token};
use crate::output;
use crate::session::Session;
use crate::share::ShareLink;
use crate::store::FileId;
use colored::Colorize;

type Result<T> = std::result::Result<T, DriveError>;

/// Execute a share subcommand
///
/// # Errors
/// Returns an error if not signed in, the file or link is unknown, access
/// to a link is refused, or the session cannot be saved
pub fn execute(ctx: &Context, command: &ShareCommands) -> Result<()> {
    let mut session = Session::require(ctx.db)?;
    match command {
        ShareCommands::Create { id, options } => {
            let link = session.share_file(&FileId::new(id.as_str()), options.to_options(), ctx.now)?;
            session.save(ctx.db)?;
            print_link("Created share link", &link, ctx);
        }
        ShareCommands::List { file } => {
            let file_id = file.as_deref().map(FileId::new);
            let links: Vec<&ShareLink> = match &file_id {
                Some(id) => session.shares.list_for_file(id).collect(),
                None => session.shares.list().collect(),
            };
            if links.is_empty() {
                ctx.info("No share links.");
            } else {
                if !ctx.quiet {
                    println!("{}:", count(links.len(), "share link"));
                }
                for link in links {
                    println!("{}", output::share_line(link, ctx.now, ctx.quiet));
                }
            }
        }
        ShareCommands::Update { link, options } => {
            let updated = session.shares.update(link, options.to_options(), ctx.now)?.clone();
            session.save(ctx.db)?;
            print_link("Updated share link", &updated, ctx);
        }
        ShareCommands::Revoke { link } => {
            let revoked = session.revoke_share(link)?;
            session.save(ctx.db)?;
            ctx.info(format!("Revoked {} for {}", revoked.path(), revoked.file_name));
        }
        ShareCommands::Open { token, password } => {
            let access = session.open_share(normalize_token(token), password.as_deref(), true, ctx.now)?;
            session.save(ctx.db)?;
            if ctx.quiet {
                println!("{}", access.file_id);
            } else {
                let yes_no = |b: bool| if b { "yes".green() } else { "no".red() };
                println!("{}", access.file_name.bold());
                println!("  Preview:  {}", yes_no(access.can_preview));
                println!("  Download: {}", yes_no(access.can_download));
            }
        }
    }
    Ok(())
}

fn print_link(heading: &str, link: &ShareLink, ctx: &Context) {
    if ctx.quiet {
        println!("{}", link.token);
    } else {
        println!("{heading}:");
        println!("{}", output::share_line(link, ctx.now, false));
    }
}

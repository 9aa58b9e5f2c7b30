//! PermiDrive CLI application entry point
//!
//! A local cloud drive: each signed-in user has a collection of files that
//! can be uploaded, listed, renamed, trashed, restored and shared through
//! links. Everything is stored in an embedded database under the data
//! directory.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (creates the account on first use) and add demo files
//! permidrive signin jane@example.com
//! permidrive seed
//!
//! # List files (default command), newest first
//! permidrive
//! permidrive ls -t images --sort size --order asc
//!
//! # Upload, trash and restore
//! permidrive upload report.pdf photo.jpg
//! permidrive rm 1
//! permidrive trash
//! permidrive restore 1
//!
//! # Share a file with a password and a 7 day expiry
//! permidrive share create 2 --password secret --expires-in 7
//!
//! # Quiet mode (only output identifiers)
//! permidrive -q ls
//! ```
//!
//! # Configuration
//!
//! Settings live in `~/.config/permidrive/config.toml` and can be changed
//! with `permidrive config set KEY=VALUE`.

use chrono::Utc;
use permidrive::{
    DriveError,
    cli::{Cli, Commands},
    commands::{self, Context},
    config::DriveConfig,
    db::Database,
    logging,
    session::ProfileUpdate,
};
use std::fs;
use tracing::debug;

type Result<T> = std::result::Result<T, DriveError>;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let command = cli.get_command();

    if let Commands::Config { command } = &command {
        let path = DriveConfig::config_path()?;
        let config = if path.exists() {
            DriveConfig::load_from(&path)?
        } else {
            DriveConfig::default()
        };
        logging::init(logging::effective_level(cli.verbose, config.log_level.as_deref()));
        let quiet = cli.quiet || config.quiet;
        return commands::config(config, &path, command, quiet);
    }

    let config = DriveConfig::load_or_setup()?;
    logging::init(logging::effective_level(cli.verbose, config.log_level.as_deref()));
    let quiet = cli.quiet || config.quiet;

    let data_dir = config.data_dir()?;
    fs::create_dir_all(&data_dir)?;
    debug!(path = %data_dir.display(), "opening database");
    let db = Database::open(data_dir.join("db"))?;

    let ctx = Context::new(&db, &config, quiet, cli.yes, Utc::now());
    match &command {
        Commands::Signin { email, name } => commands::account::signin(&ctx, email, name.as_deref()),
        Commands::Signout => commands::account::signout(&ctx),
        Commands::Whoami => commands::account::whoami(&ctx),
        Commands::Profile {
            name,
            display_name,
            image,
        } => commands::account::profile(
            &ctx,
            ProfileUpdate {
                name: name.clone(),
                display_name: display_name.clone(),
                image: image.clone(),
            },
        ),
        Commands::Seed => commands::files::seed(&ctx),
        Commands::Upload { paths } => commands::files::upload(&ctx, paths),
        Commands::List { filter } => commands::list(&ctx, filter),
        Commands::Rename { id, name } => commands::files::rename(&ctx, id, name),
        Commands::Delete { ids, permanent } => commands::files::delete(&ctx, ids, *permanent),
        Commands::Restore { ids } => commands::files::restore(&ctx, ids),
        Commands::Trash { command } => commands::trash(&ctx, command.as_ref()),
        Commands::Share { command } => commands::share(&ctx, command),
        Commands::Storage => commands::storage(&ctx),
        Commands::Account { command } => commands::account::execute(&ctx, command),
        Commands::Config { .. } => unreachable!(),
    }
}

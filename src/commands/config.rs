//! Config command - read and change settings in the config file

use crate::DriveError;
use crate::cli::ConfigCommands;
use crate::config::DriveConfig;
use std::path::Path;

type Result<T> = std::result::Result<T, DriveError>;

/// Execute a config subcommand against the file at `path`
///
/// # Errors
/// Returns an error for a malformed `KEY=VALUE`, an unknown key, a value
/// that does not parse, or a config file that cannot be written
pub fn execute(mut config: DriveConfig, path: &Path, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let Some((key, value)) = setting.split_once('=') else {
                return Err(DriveError::InvalidInput(format!(
                    "Invalid format: '{setting}'. Use KEY=VALUE"
                )));
            };
            let key = key.trim();
            config.set(key, value.trim())?;
            config.save_to(path)?;
            if !quiet {
                println!("Set {key} = {}", config.get(key)?);
            }
        }
        ConfigCommands::Get { key } => {
            println!("{}", config.get(key.trim())?);
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
    }
    Ok(())
}

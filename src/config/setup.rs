//! Interactive setup wizard for first-time configuration
//!
//! Runs the first time permidrive starts without a config file.

use super::DriveConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

/// Interactive first-time setup - prompts for the data directory
///
/// Offers the platform data directory as the default, then saves a config
/// with default storage limits and view settings.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The system data directory cannot be determined
/// - User input cannot be read
/// - The configuration cannot be saved
pub fn first_time_setup() -> Result<DriveConfig, ConfigError> {
    println!("Welcome to PermiDrive! Let's choose where your drive data is kept.\n");

    let default_dir = DriveConfig::default_data_dir()?;
    let dir: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Data directory")
        .default(default_dir.to_string_lossy().to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let dir = PathBuf::from(dir);
    let config = DriveConfig {
        data_dir: (dir != default_dir).then_some(dir),
        ..DriveConfig::default()
    };
    config.save()?;

    println!("\nConfiguration saved to {}", DriveConfig::config_path()?.display());
    Ok(config)
}

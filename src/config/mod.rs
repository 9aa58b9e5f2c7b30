//! Configuration module for permidrive
//!
//! Manages application configuration: where the database lives, upload
//! limits, trash retention and default listing order. Configuration is
//! stored as TOML in the user's config directory.

mod setup;

pub use setup::first_time_setup;

use crate::query::{SortKey, SortOrder};
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 100 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
pub const DEFAULT_MAX_FILES_PER_UPLOAD: usize = 10;
pub const DEFAULT_TRASH_RETENTION_DAYS: u32 = 30;

/// MIME types accepted for upload unless configured otherwise
pub const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/zip",
    "application/x-rar-compressed",
    "video/mp4",
    "video/avi",
    "video/mov",
    "audio/mp3",
    "audio/wav",
    "audio/ogg",
];

/// Upload limits and trash retention
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Largest accepted file, in bytes
    pub max_file_size: u64,
    pub max_files_per_upload: usize,
    pub allowed_types: Vec<String>,
    /// Days a trashed file is kept before `trash sweep` removes it
    pub trash_retention_days: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_files_per_upload: DEFAULT_MAX_FILES_PER_UPLOAD,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(ToString::to_string).collect(),
            trash_retention_days: DEFAULT_TRASH_RETENTION_DAYS,
        }
    }
}

/// Default ordering for `list`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ViewConfig {
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct DriveConfig {
    /// Directory holding the database; defaults to the platform data dir
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub view: ViewConfig,
}

impl DriveConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("permidrive").join("config.toml"))
    }

    /// Default database location under the platform data directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system data directory cannot be determined.
    pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
        dirs::data_local_dir()
            .map(|dir| dir.join("permidrive"))
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))
    }

    /// Directory the database should be opened in
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no directory is configured and the system
    /// data directory cannot be determined.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_data_dir(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load()
        } else {
            first_time_setup()
        }
    }

    /// Read a setting by its dotted key, formatted for display
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for an unknown key.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "data_dir" => self
                .data_dir
                .as_ref()
                .map_or_else(|| "(default)".to_string(), |d| d.display().to_string()),
            "quiet" => self.quiet.to_string(),
            "log_level" => self.log_level.clone().unwrap_or_else(|| "(default)".to_string()),
            "storage.max_file_size" => self.storage.max_file_size.to_string(),
            "storage.max_files_per_upload" => self.storage.max_files_per_upload.to_string(),
            "storage.allowed_types" => self.storage.allowed_types.join(","),
            "storage.trash_retention_days" => self.storage.trash_retention_days.to_string(),
            "view.sort_by" => self.view.sort_by.to_string(),
            "view.sort_order" => self.view.sort_order.to_string(),
            _ => return Err(ConfigError::NotFound(key.to_string())),
        };
        Ok(value)
    }

    /// Change a setting by its dotted key
    ///
    /// Does not save; call `save` afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for an unknown key and
    /// `ConfigError::Message` when the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |what: &str| ConfigError::Message(format!("Invalid value for {key}: '{value}' ({what})"));
        match key {
            "data_dir" => {
                self.data_dir = Some(value).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
            }
            "quiet" => self.quiet = value.parse().map_err(|_| invalid("expected true or false"))?,
            "log_level" => {
                self.log_level = Some(value.trim().to_string()).filter(|v| !v.is_empty());
            }
            "storage.max_file_size" => {
                self.storage.max_file_size = value.parse().map_err(|_| invalid("expected bytes"))?;
            }
            "storage.max_files_per_upload" => {
                self.storage.max_files_per_upload = value.parse().map_err(|_| invalid("expected a count"))?;
            }
            "storage.allowed_types" => {
                self.storage.allowed_types = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_lowercase)
                    .collect();
            }
            "storage.trash_retention_days" => {
                self.storage.trash_retention_days = value.parse().map_err(|_| invalid("expected days"))?;
            }
            "view.sort_by" => {
                self.view.sort_by = SortKey::parse_lenient(value).ok_or_else(|| invalid("expected name, size, date or type"))?;
            }
            "view.sort_order" => {
                self.view.sort_order = match value.trim().to_lowercase().as_str() {
                    "asc" => SortOrder::Asc,
                    "desc" => SortOrder::Desc,
                    _ => return Err(invalid("expected asc or desc")),
                };
            }
            _ => return Err(ConfigError::NotFound(key.to_string())),
        }
        Ok(())
    }
}

//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for permidrive using the
//! `clap` crate.
//!
//! # Commands
//!
//! - **signin / signout / whoami / profile**: account session
//! - **upload / list / rename / delete / restore**: file collection
//! - **trash**: list, purge, empty and sweep the trash
//! - **share**: create, list, update, revoke and open share links
//! - **storage**: quota usage by category
//! - **account**: export or delete everything
//! - **config**: read and change settings
//!
//! Running without a command lists files.

use crate::config::ViewConfig;
use crate::query::FilterSpec;
use crate::share::ShareOptions;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "permidrive")]
#[command(about = "A local cloud drive: upload, browse, trash and share files", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Search and ordering flags for listings
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    /// Only names containing this text (case-insensitive)
    #[arg(short = 's', long = "search", value_name = "TEXT")]
    pub search: Option<String>,

    /// Only files in this category (images, documents, spreadsheets, presentations, videos, audio, archives, code)
    #[arg(short = 't', long = "type", value_name = "CATEGORY")]
    pub mime_type: Option<String>,

    /// Sort by name, size, date or type (default from config)
    #[arg(long = "sort", value_name = "KEY")]
    pub sort_by: Option<String>,

    /// Sort direction: asc or desc (default from config)
    #[arg(long = "order", value_name = "ORDER")]
    pub sort_order: Option<String>,
}

impl FilterArgs {
    /// Build a filter, filling unset sort flags from the configured view
    #[must_use]
    pub fn to_spec(&self, view: &ViewConfig) -> FilterSpec {
        let sort_by = self.sort_by.clone().unwrap_or_else(|| view.sort_by.to_string());
        let sort_order = self
            .sort_order
            .clone()
            .unwrap_or_else(|| view.sort_order.to_string());
        FilterSpec::from_strs(
            self.search.as_deref().unwrap_or_default(),
            self.mime_type.as_deref().unwrap_or_default(),
            &sort_by,
            &sort_order,
        )
    }
}

/// Access rules for a share link
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareArgs {
    /// Require this password to open the link
    #[arg(long = "password", value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Expire the link after this many days
    #[arg(long = "expires-in", value_name = "DAYS")]
    pub expires_in_days: Option<u32>,

    /// Recipients may preview but not download
    #[arg(long = "no-download")]
    pub no_download: bool,

    /// Recipients may not preview the file
    #[arg(long = "no-preview")]
    pub no_preview: bool,

    /// Only signed-in users may open the link
    #[arg(long = "require-sign-in")]
    pub require_sign_in: bool,
}

impl ShareArgs {
    #[must_use]
    pub fn to_options(&self) -> ShareOptions {
        let mut options = ShareOptions::default()
            .allow_download(!self.no_download)
            .allow_preview(!self.no_preview)
            .require_sign_in(self.require_sign_in);
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            options = options.with_password(password);
        }
        if let Some(days) = self.expires_in_days {
            options = options.with_expiry_days(days);
        }
        options
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Sign in (creates the account on first use)
    Signin {
        /// Account email address
        #[arg(value_name = "EMAIL")]
        email: String,

        /// Account name for a new account (defaults to the email's local part)
        #[arg(short = 'n', long = "name")]
        name: Option<String>,
    },

    /// Sign out; files stay stored for the next sign-in
    Signout,

    /// Show the signed-in account
    Whoami,

    /// Show or change profile details
    Profile {
        /// New account name
        #[arg(long = "name")]
        name: Option<String>,

        /// New display name (empty string clears it)
        #[arg(long = "display-name")]
        display_name: Option<String>,

        /// New avatar image URL (empty string clears it)
        #[arg(long = "image")]
        image: Option<String>,
    },

    /// Add demo files to the drive
    Seed,

    /// Upload local files
    #[command(visible_alias = "up")]
    Upload {
        /// Files to upload
        #[arg(value_name = "FILE", required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },

    /// List files (default)
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Rename a file
    Rename {
        /// File id
        id: String,
        /// New name
        name: String,
    },

    /// Move files to the trash
    #[command(visible_alias = "rm")]
    Delete {
        /// File ids
        #[arg(value_name = "ID", required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Delete immediately instead of moving to the trash
        #[arg(long = "permanent")]
        permanent: bool,
    },

    /// Restore files from the trash
    Restore {
        /// File ids
        #[arg(value_name = "ID", required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Manage the trash
    Trash {
        #[command(subcommand)]
        command: Option<TrashCommands>,
    },

    /// Manage share links
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },

    /// Show storage usage
    Storage,

    /// Export or delete the account
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Trash subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TrashCommands {
    /// List trashed files with time left (default)
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Permanently delete specific trashed files
    Purge {
        #[arg(value_name = "ID", required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Permanently delete everything in the trash
    Empty,

    /// Permanently delete files whose retention period has passed
    Sweep,
}

/// Share link subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShareCommands {
    /// Create a share link for a file
    Create {
        /// File id
        id: String,

        #[command(flatten)]
        options: ShareArgs,
    },

    /// List share links
    #[command(visible_alias = "ls")]
    List {
        /// Only links for this file id
        #[arg(long = "file", value_name = "ID")]
        file: Option<String>,
    },

    /// Replace a link's access rules
    Update {
        /// Link id
        link: String,

        #[command(flatten)]
        options: ShareArgs,
    },

    /// Delete a share link
    Revoke {
        /// Link id
        link: String,
    },

    /// Open a link as a recipient would
    Open {
        /// Link token or `/share/<token>` path
        token: String,

        /// Password for protected links
        #[arg(long = "password")]
        password: Option<String>,
    },
}

/// Account subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AccountCommands {
    /// Write the profile, files and share links as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Delete the account and everything stored for it
    Delete,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., storage.trash_retention_days=14)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., view.sort_by)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the config file location
    Path,
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to List if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::List {
            filter: FilterArgs::default(),
        })
    }
}

impl TrashCommands {
    #[must_use]
    pub fn or_default(command: Option<Self>) -> Self {
        command.unwrap_or(Self::List {
            filter: FilterArgs::default(),
        })
    }
}

/// Strip an optional `/share/` prefix from a token argument
#[must_use]
pub fn normalize_token(token: &str) -> &str {
    let token = token.trim();
    token
        .rsplit_once("/share/")
        .map_or(token, |(_, rest)| rest)
        .trim_end_matches('/')
}

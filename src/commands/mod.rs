//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation against the signed-in session. Commands that
//! change anything save the session before returning.

use crate::DriveError;
use crate::config::DriveConfig;
use crate::db::Database;
use chrono::{DateTime, Utc};
use dialoguer::{Confirm, theme::ColorfulTheme};

pub mod account;
pub mod config;
pub mod files;
pub mod list;
pub mod share;
pub mod storage;
pub mod trash;

// Re-export execute functions for convenience
pub use self::config::execute as config;
pub use list::execute as list;
pub use share::execute as share;
pub use storage::execute as storage;
pub use trash::execute as trash;

type Result<T> = std::result::Result<T, DriveError>;

/// Shared state every command runs with
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub db: &'a Database,
    pub config: &'a DriveConfig,
    pub quiet: bool,
    /// Skip confirmation prompts
    pub yes: bool,
    /// Clock reading for this invocation
    pub now: DateTime<Utc>,
}

impl<'a> Context<'a> {
    #[must_use]
    pub const fn new(db: &'a Database, config: &'a DriveConfig, quiet: bool, yes: bool, now: DateTime<Utc>) -> Self {
        Self {
            db,
            config,
            quiet,
            yes,
            now,
        }
    }

    /// Ask before a destructive step
    ///
    /// Always true with `--yes`. In quiet mode nothing is prompted and the
    /// answer is no, so scripts must pass `--yes` explicitly.
    ///
    /// # Errors
    ///
    /// Returns `DriveError::Prompt` if the terminal cannot be read.
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.yes {
            return Ok(true);
        }
        if self.quiet {
            return Ok(false);
        }
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    /// Print an informational line unless quiet
    pub fn info(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }
}

/// Pluralise a count for messages, e.g. `3 files`
#[must_use]
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

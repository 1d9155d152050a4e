//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the stores.

pub mod backup;
pub mod db;
pub mod index;
pub mod prompt;

pub use backup::{handle_backup_command, BackupCommands};
pub use db::{handle_db_command, DbCommands};
pub use index::{handle_index_command, IndexCommands};
pub use prompt::{handle_prompt_command, PromptCommands};

use crate::config::{Settings, VaultPaths};
use crate::display::format_skipped;
use crate::error::VaultResult;
use crate::index::IndexBuilder;
use crate::storage::PromptRepository;

/// Rebuild `index.json` after a write when the settings ask for it
pub(crate) fn refresh_index(paths: &VaultPaths, settings: &Settings) -> VaultResult<()> {
    if !settings.rebuild_index_on_write {
        return Ok(());
    }

    let report = IndexBuilder::new(PromptRepository::new(paths.prompts_dir())).build()?;
    if !report.skipped.is_empty() {
        eprint!("{}", format_skipped(&report.skipped));
    }
    Ok(())
}

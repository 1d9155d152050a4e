//! Backup CLI commands
//!
//! Implements CLI commands for snapshot management.

use clap::Subcommand;

use super::refresh_index;
use crate::backup::{BackupManager, RestoreManager};
use crate::config::{Settings, VaultPaths};
use crate::display::{format_backup_list, format_skipped, format_verification};
use crate::error::VaultResult;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot the prompt directory
    Create,

    /// List all available backups, newest first
    List,

    /// Show the manifest and file count of a backup
    Info {
        /// Backup timestamp (use 'latest' for most recent)
        backup: String,
    },

    /// Copy a backup's prompts back into the store, after backing up the
    /// current prompts
    Restore {
        /// Backup timestamp (use 'latest' for most recent)
        backup: String,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &VaultPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> VaultResult<()> {
    let manager = BackupManager::from_paths(paths);

    match cmd {
        BackupCommands::Create => {
            println!("Creating backup...");
            let report = manager.create_backup_with_report()?;
            println!("Backup created: {}", report.manifest.timestamp);
            println!("Location: {}", report.path.display());
            println!("Prompts: {}", report.manifest.count);
            print!("{}", format_skipped(&report.skipped));
        }

        BackupCommands::List => {
            let backups = manager.list_backups()?;
            println!("{}", format_backup_list(&backups));
            if backups.is_empty() {
                println!("Create one with: pvault backup create");
            }
        }

        BackupCommands::Info { backup } => {
            let timestamp = resolve_backup(&manager, &backup)?;
            let verification = RestoreManager::from_paths(paths).verify_backup(&timestamp)?;
            print!("{}", format_verification(&verification));
        }

        BackupCommands::Restore { backup } => {
            let timestamp = resolve_backup(&manager, &backup)?;
            let restore_manager = RestoreManager::from_paths(paths);
            // Fails with NotFound before a backup of current data is taken
            restore_manager.verify_backup(&timestamp)?;

            println!("Creating backup of current data before restore...");
            let pre_restore_backup = manager.create_backup()?;
            println!("Pre-restore backup saved: {}", pre_restore_backup.display());
            println!();

            println!("Restoring from backup {}...", timestamp);
            let result = restore_manager.restore_from_backup(&timestamp)?;
            refresh_index(paths, settings)?;

            println!("Restore complete!");
            println!("{}", result.summary());
        }
    }

    Ok(())
}

/// Resolve 'latest' to the newest snapshot's timestamp
fn resolve_backup(manager: &BackupManager, backup: &str) -> VaultResult<String> {
    if backup != "latest" {
        return Ok(backup.to_string());
    }

    manager
        .get_latest_backup()?
        .map(|info| info.timestamp)
        .ok_or_else(|| crate::error::VaultError::backup_not_found("latest"))
}

//! Relational mirror CLI commands
//!
//! The mirror is only ever written on request. Export and import are
//! one-way copies between it and the file store.

use clap::Subcommand;

use super::refresh_index;
use crate::backup::BackupManager;
use crate::config::{Settings, VaultPaths};
use crate::db::SqliteMirror;
use crate::display::{format_prompt_details, format_prompt_list, format_skipped};
use crate::error::{VaultError, VaultResult};
use crate::storage::{PromptRepository, PromptStore};
use crate::transfer::{export_to_mirror, import_from_mirror, TransferReport};

/// Mirror subcommands
#[derive(Subcommand)]
pub enum DbCommands {
    /// Create the prompts table
    Init,
    /// List prompts in the mirror
    List,
    /// Show a prompt from the mirror
    Get {
        /// Prompt identifier
        id: String,
    },
    /// Delete a prompt from the mirror
    Delete {
        /// Prompt identifier
        id: String,
    },
    /// Copy every file-store prompt into the mirror
    Export,
    /// Copy every mirror prompt into the file store
    Import {
        /// Replace prompt files that already exist
        #[arg(long)]
        overwrite: bool,
    },
}

/// Handle a mirror command
pub fn handle_db_command(
    paths: &VaultPaths,
    settings: &Settings,
    cmd: DbCommands,
) -> VaultResult<()> {
    let mirror = SqliteMirror::open(paths.database_file())?;
    mirror.init()?;

    match cmd {
        DbCommands::Init => {
            println!("Mirror ready: {}", paths.database_file().display());
            println!("Prompts: {}", mirror.count()?);
        }

        DbCommands::List => {
            let report = PromptStore::list(&mirror)?;
            println!("{}", format_prompt_list(&report.items));
            eprint!("{}", format_skipped(&report.skipped));
        }

        DbCommands::Get { id } => {
            let prompt = mirror
                .get_by_id(&id)?
                .ok_or_else(|| VaultError::prompt_not_found(&id))?;
            print!("{}", format_prompt_details(&prompt));
        }

        DbCommands::Delete { id } => {
            if !mirror.delete(&id)? {
                return Err(VaultError::prompt_not_found(&id));
            }
            println!("Deleted prompt from mirror: {}", id);
        }

        DbCommands::Export => {
            let files = PromptRepository::new(paths.prompts_dir());
            let backups = safety_backup(paths, settings);
            let report = export_to_mirror(&files, &mirror, backups.as_ref())?;
            print_transfer(&report);
        }

        DbCommands::Import { overwrite } => {
            let files = PromptRepository::new(paths.prompts_dir());
            let backups = safety_backup(paths, settings);
            let report = import_from_mirror(&mirror, &files, overwrite, backups.as_ref())?;
            refresh_index(paths, settings)?;
            print_transfer(&report);
        }
    }

    Ok(())
}

fn safety_backup(paths: &VaultPaths, settings: &Settings) -> Option<BackupManager> {
    settings
        .backup_before_transfer
        .then(|| BackupManager::from_paths(paths))
}

fn print_transfer(report: &TransferReport) {
    if let Some(backup) = &report.backup {
        println!("Backup created: {}", backup.display());
    }
    println!("Transfer complete: {}", report.summary());
    for failure in &report.failures {
        println!("  - {} ({}): {}", failure.name, failure.id, failure.message);
    }
    print!("{}", format_skipped(&report.unreadable));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Prompt;
    use tempfile::TempDir;

    #[test]
    fn test_export_then_import_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings::default();

        let files = PromptRepository::new(paths.prompts_dir());
        let prompt = Prompt::new("Alpha", "one").with_description("d");
        files.put(&prompt.id, &prompt).unwrap();

        handle_db_command(&paths, &settings, DbCommands::Export).unwrap();
        assert_eq!(BackupManager::from_paths(&paths).list_backups().unwrap().len(), 1);

        files.delete("alpha").unwrap();
        handle_db_command(&paths, &settings, DbCommands::Import { overwrite: false }).unwrap();
        assert_eq!(files.get("alpha").unwrap().unwrap().content, "one");
    }

    #[test]
    fn test_delete_missing_row() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        let err = handle_db_command(
            &paths,
            &Settings::default(),
            DbCommands::Delete { id: "ghost".into() },
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}

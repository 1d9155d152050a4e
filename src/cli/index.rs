//! Index CLI commands

use clap::Subcommand;

use crate::config::VaultPaths;
use crate::display::{format_index, format_skipped};
use crate::error::VaultResult;
use crate::index::IndexBuilder;
use crate::storage::PromptRepository;

/// Index subcommands
#[derive(Subcommand)]
pub enum IndexCommands {
    /// Rebuild index.json from the prompt files
    Rebuild,
    /// Show the current index.json
    Show,
}

/// Handle an index command
pub fn handle_index_command(paths: &VaultPaths, cmd: IndexCommands) -> VaultResult<()> {
    let builder = IndexBuilder::new(PromptRepository::new(paths.prompts_dir()));

    match cmd {
        IndexCommands::Rebuild => {
            let report = builder.build()?;
            println!(
                "Indexed {} prompt(s) into {}",
                report.total(),
                report.path.display()
            );
            print!("{}", format_skipped(&report.skipped));
        }

        IndexCommands::Show => {
            let index = builder.load()?;
            println!("{}", format_index(&index));
        }
    }

    Ok(())
}

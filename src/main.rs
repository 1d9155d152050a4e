use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prompt_vault::cli::{
    handle_backup_command, handle_db_command, handle_index_command, handle_prompt_command,
};
use prompt_vault::config::{Settings, VaultPaths};

#[derive(Parser)]
#[command(
    name = "pvault",
    version,
    about = "File-backed prompt store with index, backups and a SQLite mirror",
    long_about = "pvault keeps prompts as JSON documents in a directory, rebuilds \
                  their index.json, takes timestamped backups of the directory and \
                  restores from them. A SQLite mirror can be filled from or \
                  imported into the file store on request."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt management commands
    #[command(subcommand)]
    Prompt(prompt_vault::cli::PromptCommands),

    /// Index commands
    #[command(subcommand)]
    Index(prompt_vault::cli::IndexCommands),

    /// Backup and restore commands
    #[command(subcommand)]
    Backup(prompt_vault::cli::BackupCommands),

    /// SQLite mirror commands
    #[command(subcommand)]
    Db(prompt_vault::cli::DbCommands),

    /// Create the vault directories and save default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = VaultPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    configure_logging(&settings);

    match cli.command {
        Some(Commands::Prompt(cmd)) => handle_prompt_command(&paths, &settings, cmd)?,
        Some(Commands::Index(cmd)) => handle_index_command(&paths, cmd)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&paths, &settings, cmd)?,
        Some(Commands::Db(cmd)) => handle_db_command(&paths, &settings, cmd)?,
        Some(Commands::Init) => {
            println!("Initializing prompt-vault at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Add a prompt with: pvault prompt add <name> <content>");
        }
        Some(Commands::Config) => {
            println!("prompt-vault Configuration");
            println!("==========================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Prompts directory: {}", paths.prompts_dir().display());
            println!("Backup directory:  {}", paths.backup_dir().display());
            println!("Mirror database:   {}", paths.database_file().display());
            println!();
            println!("Settings:");
            println!("  Backup before transfer: {}", settings.backup_before_transfer);
            println!("  Rebuild index on write: {}", settings.rebuild_index_on_write);
            println!("  Log level:              {}", settings.log_level);
        }
        None => {
            println!("pvault - file-backed prompt store");
            println!();
            println!("Run 'pvault --help' for usage information.");
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` or the configured level
fn configure_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

//! Path management for prompt-vault
//!
//! ## Path Resolution Order
//!
//! Base directory:
//! 1. `PROMPT_VAULT_DIR` environment variable (if set)
//! 2. The platform data directory (`~/.local/share/prompt-vault` on Linux)
//!
//! The records root, backup root and mirror database each default to a
//! location under the base directory and can be overridden individually with
//! `PROMPTS_DIR`, `BACKUP_DIR` and `PROMPT_VAULT_DB`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::VaultError;

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "PROMPT_VAULT_DIR";
/// Environment variable overriding the live records root
pub const PROMPTS_DIR_ENV: &str = "PROMPTS_DIR";
/// Environment variable overriding the backup root
pub const BACKUP_DIR_ENV: &str = "BACKUP_DIR";
/// Environment variable overriding the mirror database file
pub const DATABASE_ENV: &str = "PROMPT_VAULT_DB";

/// Manages all paths used by prompt-vault
#[derive(Debug, Clone)]
pub struct VaultPaths {
    base_dir: PathBuf,
    prompts_dir: PathBuf,
    backup_dir: PathBuf,
    database_file: PathBuf,
}

impl VaultPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no base directory is configured and the platform
    /// data directory cannot be determined.
    pub fn new() -> Result<Self, VaultError> {
        let base_dir = match std::env::var_os(BASE_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => resolve_default_path()?,
        };

        let mut paths = Self::with_base_dir(base_dir);
        if let Some(dir) = std::env::var_os(PROMPTS_DIR_ENV) {
            paths.prompts_dir = PathBuf::from(dir);
        }
        if let Some(dir) = std::env::var_os(BACKUP_DIR_ENV) {
            paths.backup_dir = PathBuf::from(dir);
        }
        if let Some(file) = std::env::var_os(DATABASE_ENV) {
            paths.database_file = PathBuf::from(file);
        }

        Ok(paths)
    }

    /// Create VaultPaths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            prompts_dir: base_dir.join("prompts"),
            backup_dir: base_dir.join("backups"),
            database_file: base_dir.join("prompts.db"),
            base_dir,
        }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the live records root
    pub fn prompts_dir(&self) -> &Path {
        &self.prompts_dir
    }

    /// Get the backup root
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Get the mirror database file
    pub fn database_file(&self) -> &Path {
        &self.database_file
    }

    /// Get the path to the derived index artifact
    pub fn index_file(&self) -> PathBuf {
        self.prompts_dir.join(crate::index::INDEX_FILE_NAME)
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base, records and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), VaultError> {
        for (label, dir) in [
            ("base", &self.base_dir),
            ("prompts", &self.prompts_dir),
            ("backup", &self.backup_dir),
        ] {
            std::fs::create_dir_all(dir).map_err(|e| {
                VaultError::Io(format!("Failed to create {} directory: {}", label, e))
            })?;
        }
        Ok(())
    }
}

/// Resolve the default base directory for the current platform
fn resolve_default_path() -> Result<PathBuf, VaultError> {
    ProjectDirs::from("", "", "prompt-vault")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| VaultError::Config("Could not determine a data directory".into()))
}

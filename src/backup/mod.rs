//! Backup system for prompt-vault
//!
//! Point-in-time snapshots of the prompt directory and restore from them.
//!
//! # Architecture
//!
//! - `BackupManager`: creates snapshots and lists the ones on disk
//! - `RestoreManager`: verifies snapshots and copies them back into the live store
//!
//! # Snapshot Format
//!
//! Each snapshot is a directory under the backup root named after its UTC
//! creation time with `:` and `.` replaced by `-`
//! (`2025-11-27T14-30-22-456Z`). It holds a byte-for-byte copy of every
//! readable prompt file plus `manifest.json`:
//!
//! ```json
//! { "timestamp": "...", "count": 2, "prompts": [{ "id": "a", "name": "A" }], "date": "..." }
//! ```
//!
//! The manifest is always written after the last prompt copy, so a snapshot
//! with a manifest is complete. A snapshot without one was interrupted and is
//! listed with a count of `-1`.
//!
//! # Example
//!
//! ```rust,ignore
//! use prompt_vault::backup::{BackupManager, RestoreManager};
//! use prompt_vault::config::VaultPaths;
//!
//! let paths = VaultPaths::new()?;
//! let backups = BackupManager::from_paths(&paths);
//! let snapshot = backups.create_backup()?;
//!
//! // Later, restore from it
//! let restore = RestoreManager::from_paths(&paths);
//! let result = restore.restore_from_backup("2025-11-27T14-30-22-456Z")?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{
    parse_snapshot_timestamp, snapshot_id, BackupInfo, BackupManager, BackupReport, Manifest,
    MANIFEST_FILE_NAME, MISSING_MANIFEST_COUNT,
};
pub use restore::{BackupVerification, RestoreManager, RestoreResult};

//! prompt-vault - a file-backed prompt store
//!
//! Prompts live as one JSON document each in a records directory. Around that
//! store the crate provides an index builder, timestamped directory backups
//! with manifests, restore, and an optional SQLite mirror that can be filled
//! from or drained into the file store on request.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: The prompt record and template helpers
//! - `storage`: The `PromptStore` interface and the JSON file store
//! - `index`: `index.json` generation
//! - `backup`: Snapshot creation, listing and restore
//! - `db`: The SQLite mirror
//! - `transfer`: One-way copies between the file store and the mirror
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `pvault` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use prompt_vault::config::VaultPaths;
//! use prompt_vault::index::IndexBuilder;
//! use prompt_vault::storage::PromptRepository;
//!
//! let paths = VaultPaths::new()?;
//! let report = IndexBuilder::new(PromptRepository::new(paths.prompts_dir())).build()?;
//! println!("{} prompts indexed", report.total());
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod index;
pub mod models;
pub mod storage;
pub mod transfer;

pub use error::VaultError;

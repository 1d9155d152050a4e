//! Configuration module for prompt-vault
//!
//! This module provides configuration management including:
//! - Path resolution for the records root, backup root and mirror database
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::VaultPaths;
pub use settings::Settings;

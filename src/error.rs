//! Custom error types for prompt-vault
//!
//! This module defines the error hierarchy for the vault using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for prompt-vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A stored document exists but is not a valid record
    #[error("Failed to parse {identifier}: {message}")]
    Parse { identifier: String, message: String },

    /// Validation errors for identifiers and records
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Relational mirror errors
    #[error("Database error: {0}")]
    Database(String),
}

impl VaultError {
    /// Create a "not found" error for prompts
    pub fn prompt_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Prompt",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Create a parse failure for a stored document
    pub fn parse(identifier: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            identifier: identifier.into(),
            message: message.to_string(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a parse failure
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type alias for prompt-vault operations
pub type VaultResult<T> = Result<T, VaultError>;

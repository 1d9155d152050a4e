//! Display formatting for terminal output
//!
//! Formats prompts, backups and bulk-operation reports for the CLI.

pub mod backup;
pub mod prompt;

pub use backup::{format_backup_list, format_verification};
pub use prompt::{format_index, format_prompt_details, format_prompt_list, format_skipped};

//! Relational mirror of the prompt store
//!
//! A SQLite table holding the same prompt records as the file store. It is
//! written independently; nothing here keeps the two in step.

pub mod prompts;
pub mod schema;

pub use prompts::SqliteMirror;

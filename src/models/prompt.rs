//! Prompt model
//!
//! A prompt is a named piece of text, optionally a template with
//! `{{placeholder}}` tokens, plus descriptive tags and metadata.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::template::{extract_variables, render_template, slugify};

/// Version marker written on records created by this crate
pub const CURRENT_RECORD_VERSION: u32 = 1;

/// A persisted prompt record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique identifier, also the file stem in the file store
    #[serde(default)]
    pub id: String,

    /// Display name
    pub name: String,

    /// Prompt text, may contain `{{placeholder}}` tokens
    pub content: String,

    /// Optional human description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional grouping category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Tags in insertion order (duplicates allowed)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Whether `content` is a template
    #[serde(default)]
    pub is_template: bool,

    /// Placeholder names expected in `content`
    #[serde(default)]
    pub variables: Vec<String>,

    /// Record format version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Free-form metadata carried into the index
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// When the prompt was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the prompt was last modified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Prompt {
    /// Create a new prompt with an identifier derived from its name
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: slugify(&name),
            name,
            content: content.into(),
            description: None,
            category: None,
            tags: Vec::new(),
            is_template: false,
            variables: Vec::new(),
            version: Some(CURRENT_RECORD_VERSION),
            metadata: serde_json::Map::new(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Create a template prompt, collecting its variables from the content
    pub fn template(name: impl Into<String>, content: impl Into<String>) -> Self {
        let mut prompt = Self::new(name, content);
        prompt.is_template = true;
        prompt.variables = extract_variables(&prompt.content);
        prompt
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replace the tag list
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Fill in defaults for records that arrive from outside the file store
    ///
    /// Templates without a declared variable list get one extracted from
    /// their content, and a missing version marker is set to the current one.
    pub fn normalize(&mut self) {
        if self.is_template && self.variables.is_empty() {
            self.variables = extract_variables(&self.content);
        }
        if self.version.is_none() {
            self.version = Some(CURRENT_RECORD_VERSION);
        }
    }

    /// Mark the prompt as modified now
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.created_at.get_or_insert(now);
        self.updated_at = Some(now);
    }

    /// Render the prompt with the given placeholder values
    ///
    /// Non-template prompts are returned verbatim.
    pub fn render(&self, values: &HashMap<String, String>) -> String {
        if !self.is_template {
            return self.content.clone();
        }
        render_template(&self.content, values)
    }

    /// Placeholders declared by the prompt that `values` does not supply
    pub fn missing_variables(&self, values: &HashMap<String, String>) -> Vec<String> {
        self.variables
            .iter()
            .filter(|name| !values.contains_key(name.as_str()))
            .cloned()
            .collect()
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Identifier and name of a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSummary {
    pub id: String,
    pub name: String,
}

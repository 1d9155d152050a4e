//! Results of bulk scans
//!
//! Bulk operations (list, index build, backup) skip records they cannot use
//! and keep going. `ScanReport` carries both what was read and what was
//! skipped, so callers and tests can see exactly which records were dropped.

use std::fmt;

/// Why a record was left out of a bulk operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file could not be read
    Read(String),
    /// The file is not valid JSON or not a valid record
    Parse(String),
    /// The document lacks a field the operation requires
    MissingField(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(msg) => write!(f, "unreadable: {}", msg),
            Self::Parse(msg) => write!(f, "invalid: {}", msg),
            Self::MissingField(field) => write!(f, "missing required field '{}'", field),
        }
    }
}

/// A record left out of a bulk operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Storage key (file stem or row id) of the record
    pub identifier: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

impl SkippedRecord {
    pub fn new(identifier: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            identifier: identifier.into(),
            reason,
        }
    }
}

impl fmt::Display for SkippedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.identifier, self.reason)
    }
}

/// Items read by a bulk scan plus the records that were skipped
#[derive(Debug, Clone)]
pub struct ScanReport<T> {
    pub items: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

impl<T> Default for ScanReport<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> ScanReport<T> {
    /// Whether nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Identifiers of the skipped records
    pub fn skipped_ids(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.identifier.as_str()).collect()
    }

    /// Transform the items, keeping the skip list
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ScanReport<U> {
        ScanReport {
            items: self.items.into_iter().map(f).collect(),
            skipped: self.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_map_keeps_skipped() {
        let report = ScanReport {
            items: vec![1, 2, 3],
            skipped: vec![SkippedRecord::new("bad", SkipReason::Parse("eof".into()))],
        };
        assert!(!report.is_clean());

        let doubled = report.map(|n| n * 2);
        assert_eq!(doubled.items, vec![2, 4, 6]);
        assert_eq!(doubled.skipped_ids(), vec!["bad"]);
    }

    #[test]
    fn test_skip_reason_display() {
        let skipped = SkippedRecord::new("b", SkipReason::MissingField("description"));
        assert_eq!(
            skipped.to_string(),
            "b: missing required field 'description'"
        );
    }
}

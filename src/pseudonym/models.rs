//! Pseudonymization result models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One detected name and what it was replaced with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Original name text (hashed in audit logs)
    pub original: String,
    /// Assigned pseudonym, `None` when the span was kept
    pub pseudonym: Option<String>,
    /// Byte offset of the name in the input
    pub start: usize,
    /// Byte offset one past the name in the input
    pub end: usize,
}

/// Result of pseudonymizing one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PseudonymizedText {
    /// Caller-supplied document identifier
    pub document_id: String,
    /// Output text; identical to the input in dry-run mode
    pub text: String,
    /// All detected names in input order
    pub replacements: Vec<Replacement>,
    /// Occurrences that could not be pseudonymized
    pub failures: Vec<String>,
    pub dry_run: bool,
    pub processing_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl PseudonymizedText {
    pub fn new(document_id: String, text: String, replacements: Vec<Replacement>, dry_run: bool) -> Self {
        Self {
            document_id,
            text,
            replacements,
            failures: Vec::new(),
            dry_run,
            processing_time_ms: 0,
            timestamp: Utc::now(),
        }
    }

    /// Number of detected names
    pub fn detection_count(&self) -> usize {
        self.replacements.len()
    }

    /// Number of names that received a pseudonym
    pub fn replaced_count(&self) -> usize {
        self.replacements.iter().filter(|r| r.pseudonym.is_some()).count()
    }
}

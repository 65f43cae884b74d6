//! Original name to pseudonym mapping
//!
//! Keys are normalized (trimmed, case-folded, inner whitespace collapsed) so that
//! `"John  Smith"` and `"JOHN SMITH"` share one pseudonym. The mapping only grows:
//! a key is written once and never changed or removed.

use crate::domain::{PseudonymError, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Normalize an original name into a mapping key
pub fn normalize_key(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Append-only table of assigned pseudonyms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PseudonymMapping {
    entries: HashMap<String, String>,
    /// Normalized pseudonyms already handed out
    pseudonyms: HashSet<String>,
}

impl PseudonymMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached pseudonym for an original name
    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(&normalize_key(original)).map(String::as_str)
    }

    pub fn contains(&self, original: &str) -> bool {
        self.entries.contains_key(&normalize_key(original))
    }

    /// Store `pseudonym` unless the key already has one; returns the stored value
    pub fn insert_once(&mut self, original: &str, pseudonym: String) -> &str {
        let pseudonyms = &mut self.pseudonyms;
        self.entries
            .entry(normalize_key(original))
            .or_insert_with(|| {
                pseudonyms.insert(normalize_key(&pseudonym));
                pseudonym
            })
            .as_str()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any original name is already mapped to `pseudonym`
    pub fn has_pseudonym(&self, pseudonym: &str) -> bool {
        self.pseudonyms.contains(&normalize_key(pseudonym))
    }

    /// Entries sorted by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let sorted: BTreeMap<&str, &str> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        sorted.into_iter()
    }

    /// Load a mapping previously written by [`save`](Self::save)
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object of strings.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PseudonymError::Io(format!("Failed to read mapping file {}: {}", path.display(), e))
        })?;
        let raw: BTreeMap<String, String> = serde_json::from_str(&content)?;

        let mut mapping = Self::new();
        for (original, pseudonym) in raw {
            mapping.insert_once(&original, pseudonym);
        }

        tracing::info!(path = %path.display(), entries = mapping.len(), "Pseudonym mapping loaded");
        Ok(mapping)
    }

    /// Write the mapping as a JSON object with sorted keys
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let sorted: BTreeMap<&str, &str> = self.iter().collect();
        let json = serde_json::to_string_pretty(&sorted)?;
        std::fs::write(path, json).map_err(|e| {
            PseudonymError::Io(format!("Failed to write mapping file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), entries = self.len(), "Pseudonym mapping saved");
        Ok(())
    }
}

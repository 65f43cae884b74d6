//! Name catalog
//!
//! Loads a configurable list of candidate names and indexes it by
//! (gender, role). Two source formats are accepted:
//!
//! - plain text, one entry per line: either `text,gender,role` or a full name
//!   (`Jane Doe`) whose first token becomes a given name and last token a family name
//! - TOML, as an array of `[[names]]` tables with `text`, `gender` and `role` keys
//!
//! ```text
//! # names.txt
//! Oliver,male,given
//! Amelia,female,given
//! Hartley,unspecified,family
//! Robin Ashdown
//! ```
//!
//! An entry spanning several words (`Mary Ann`, `Smith-Jones`) is split into one
//! entry per word so every draw fills exactly one name token. Malformed entries
//! are skipped with a warning. A source that cannot be read at
//! all degrades to an empty catalog via [`NameCatalog::load_or_empty`].

use crate::domain::{Gender, NameRecord, NameRole, PseudonymError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// TOML catalog document
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    names: Vec<toml::Value>,
}

/// Gender-partitioned candidate name index
pub struct NameCatalog {
    buckets: HashMap<(Gender, NameRole), Vec<NameRecord>>,
    /// Lowercased given name -> (seen as male, seen as female)
    given_genders: HashMap<String, (bool, bool)>,
    rng: StdRng,
}

impl NameCatalog {
    /// Build a catalog from already-parsed records
    pub fn new(records: Vec<NameRecord>, rng: StdRng) -> Self {
        let mut buckets: HashMap<(Gender, NameRole), Vec<NameRecord>> = HashMap::new();
        let mut given_genders: HashMap<String, (bool, bool)> = HashMap::new();
        let mut seen: HashSet<(Gender, NameRole, String)> = HashSet::new();

        for record in records.into_iter().flat_map(split_words) {
            if !seen.insert((record.gender, record.role, record.text.to_lowercase())) {
                continue;
            }

            if record.role == NameRole::Given {
                let seen = given_genders.entry(record.text.to_lowercase()).or_default();
                match record.gender {
                    Gender::Male => seen.0 = true,
                    Gender::Female => seen.1 = true,
                    Gender::Unspecified => {}
                }
            }

            buckets
                .entry((record.gender, record.role))
                .or_default()
                .push(record);
        }

        Self {
            buckets,
            given_genders,
            rng,
        }
    }

    /// An empty catalog; every lookup falls through to the generator
    pub fn empty(rng: StdRng) -> Self {
        Self::new(Vec::new(), rng)
    }

    /// Load a catalog from a file, choosing the format by extension
    ///
    /// # Errors
    ///
    /// Returns [`PseudonymError::CatalogLoad`] if the file cannot be read or a
    /// TOML document cannot be parsed at all. Individual malformed entries are
    /// skipped, not reported as errors.
    pub fn from_file<P: AsRef<Path>>(path: P, rng: StdRng) -> Result<Self> {
        let records = read_records(path.as_ref())?;
        Ok(Self::new(records, rng))
    }

    /// Load a catalog from a file, degrading to an empty catalog on failure
    pub fn load_or_empty<P: AsRef<Path>>(path: P, rng: StdRng) -> Self {
        let path = path.as_ref();
        match read_records(path) {
            Ok(records) => {
                let catalog = Self::new(records, rng);
                tracing::info!(
                    path = %path.display(),
                    names = catalog.len(),
                    male_given = catalog.bucket_len(Gender::Male, NameRole::Given),
                    female_given = catalog.bucket_len(Gender::Female, NameRole::Given),
                    family = catalog.bucket_len(Gender::Unspecified, NameRole::Family),
                    "Name catalog loaded"
                );
                catalog
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Name catalog unavailable, falling back to generated names"
                );
                Self::empty(rng)
            }
        }
    }

    /// Parse the plain-text line format
    pub fn from_lines(content: &str, rng: StdRng) -> Self {
        Self::new(parse_line_records(content), rng)
    }

    /// Parse the TOML format
    pub fn from_toml(content: &str, rng: StdRng) -> Result<Self> {
        Ok(Self::new(parse_toml_records(content)?, rng))
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records stored under exactly this bucket
    pub fn bucket_len(&self, gender: Gender, role: NameRole) -> usize {
        self.buckets.get(&(gender, role)).map_or(0, Vec::len)
    }

    /// Draw one record uniformly from the bucket matching `gender` and `role`
    ///
    /// # Errors
    ///
    /// Returns [`PseudonymError::CatalogExhausted`] when neither the requested
    /// bucket nor its fallback holds any record.
    pub fn lookup(&mut self, gender: Gender, role: NameRole) -> Result<NameRecord> {
        self.lookup_excluding(gender, role, &[])
    }

    /// Like [`lookup`](Self::lookup), avoiding names already drawn for the
    /// current assignment whenever the bucket offers an alternative
    pub fn lookup_excluding(
        &mut self,
        gender: Gender,
        role: NameRole,
        exclude: &[String],
    ) -> Result<NameRecord> {
        let pool = candidates(&self.buckets, gender, role);
        let fresh: Vec<&NameRecord> = pool
            .iter()
            .copied()
            .filter(|r| !exclude.iter().any(|e| e.eq_ignore_ascii_case(&r.text)))
            .collect();
        let pool = if fresh.is_empty() { pool } else { fresh };

        pool.choose(&mut self.rng)
            .map(|r| (*r).clone())
            .ok_or(PseudonymError::CatalogExhausted { gender, role })
    }

    /// Gender of a given name if the catalog lists it under exactly one gender
    pub fn infer_gender(&self, given: &str) -> Option<Gender> {
        match self.given_genders.get(&given.trim().to_lowercase()) {
            Some((true, false)) => Some(Gender::Male),
            Some((false, true)) => Some(Gender::Female),
            _ => None,
        }
    }
}

/// One record per word of a multi-word entry
fn split_words(record: NameRecord) -> Vec<NameRecord> {
    let words: Vec<&str> = record
        .text
        .split(|c: char| !(c.is_alphabetic() || c == '\'' || c == '’'))
        .map(|w| w.trim_matches(|c: char| c == '\'' || c == '’'))
        .filter(|w| !w.is_empty())
        .collect();

    if words.len() == 1 && words[0] == record.text {
        return vec![record];
    }
    if words.len() > 1 {
        tracing::warn!(text = %record.text, words = words.len(), "Splitting multi-word catalog entry");
    }
    words
        .into_iter()
        .map(|w| NameRecord::new(w, record.gender, record.role))
        .collect()
}

/// Records eligible for a query, applying the gender resolution policy
fn candidates(
    buckets: &HashMap<(Gender, NameRole), Vec<NameRecord>>,
    gender: Gender,
    role: NameRole,
) -> Vec<&NameRecord> {
    let bucket = |g: Gender| buckets.get(&(g, role)).map(Vec::as_slice).unwrap_or(&[]);

    match gender {
        Gender::Male | Gender::Female => {
            let own = bucket(gender);
            if own.is_empty() {
                bucket(Gender::Unspecified).iter().collect()
            } else {
                own.iter().collect()
            }
        }
        Gender::Unspecified => {
            let combined = bucket(Gender::Unspecified);
            if combined.is_empty() {
                bucket(Gender::Male)
                    .iter()
                    .chain(bucket(Gender::Female).iter())
                    .collect()
            } else {
                combined.iter().collect()
            }
        }
    }
}

fn read_records(path: &Path) -> Result<Vec<NameRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PseudonymError::CatalogLoad(format!(
            "Failed to read name list {}: {}",
            path.display(),
            e
        ))
    })?;

    if path.extension().and_then(|s| s.to_str()) == Some("toml") {
        parse_toml_records(&content)
    } else {
        Ok(parse_line_records(&content))
    }
}

fn parse_line_records(content: &str) -> Vec<NameRecord> {
    let mut records = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [full_name] => {
                let tokens: Vec<&str> = full_name.split_whitespace().collect();
                if let Some(first) = tokens.first() {
                    records.push(NameRecord::new(*first, Gender::Unspecified, NameRole::Given));
                }
                if tokens.len() > 1 {
                    if let Some(last) = tokens.last() {
                        records.push(NameRecord::new(*last, Gender::Unspecified, NameRole::Family));
                    }
                }
            }
            [text, gender, role] if !text.is_empty() => {
                match (gender.parse::<Gender>(), role.parse::<NameRole>()) {
                    (Ok(gender), Ok(role)) => records.push(NameRecord::new(*text, gender, role)),
                    (Err(reason), _) | (_, Err(reason)) => {
                        tracing::warn!(line = idx + 1, reason = %reason, "Skipping malformed catalog entry");
                    }
                }
            }
            _ => {
                tracing::warn!(
                    line = idx + 1,
                    fields = fields.len(),
                    "Skipping malformed catalog entry: expected 'name' or 'text,gender,role'"
                );
            }
        }
    }

    records
}

fn parse_toml_records(content: &str) -> Result<Vec<NameRecord>> {
    let file: CatalogFile = toml::from_str(content)
        .map_err(|e| PseudonymError::CatalogLoad(format!("Failed to parse name list TOML: {e}")))?;

    let mut records = Vec::with_capacity(file.names.len());
    for (idx, value) in file.names.into_iter().enumerate() {
        match value.try_into::<NameRecord>() {
            Ok(record) if !record.text.trim().is_empty() => records.push(NameRecord {
                text: record.text.trim().to_string(),
                ..record
            }),
            Ok(_) => {
                tracing::warn!(entry = idx, "Skipping catalog entry with empty text");
            }
            Err(e) => {
                tracing::warn!(entry = idx, error = %e, "Skipping malformed catalog entry");
            }
        }
    }

    Ok(records)
}

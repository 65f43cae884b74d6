//! Audit logger for pseudonymization runs

use crate::pseudonym::models::{PseudonymizedText, Replacement};
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    document_id: String,
    detections_count: usize,
    replacements_count: usize,
    failures_count: usize,
    dry_run: bool,
    processing_time_ms: u64,
    replacements: Vec<AuditReplacement>,
}

/// Audit replacement entry (with hashed original)
#[derive(Debug, Serialize)]
struct AuditReplacement {
    /// Keyed SHA-256 hash of the original name (never log plaintext names)
    original_hash: String,
    pseudonym: Option<String>,
    start: usize,
    end: usize,
}

/// Audit logger for pseudonymization runs
///
/// Each logger draws a random hash key that is never written anywhere, so a
/// hashed name cannot be recovered by hashing candidate names. Hashes of the
/// same name match within one logger only.
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
    hash_key: [u8; 32],
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
            hash_key: rand::random(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Log a pseudonymized document
    pub fn log_document(&self, result: &PseudonymizedText) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: result.timestamp.to_rfc3339(),
            document_id: result.document_id.clone(),
            detections_count: result.detection_count(),
            replacements_count: result.replaced_count(),
            failures_count: result.failures.len(),
            dry_run: result.dry_run,
            processing_time_ms: result.processing_time_ms,
            replacements: result
                .replacements
                .iter()
                .map(|r| self.create_audit_replacement(r))
                .collect(),
        };

        self.write_entry(&entry)
    }

    fn create_audit_replacement(&self, replacement: &Replacement) -> AuditReplacement {
        AuditReplacement {
            original_hash: self.hash_name(&replacement.original),
            pseudonym: replacement.pseudonym.clone(),
            start: replacement.start,
            end: replacement.end,
        }
    }

    /// Hash a name with this logger's key
    fn hash_name(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.hash_key);
        hasher.update(value.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Document: {} | Detections: {} | Replaced: {} | Failures: {} | Dry run: {} | Time: {}ms",
                entry.timestamp,
                entry.document_id,
                entry.detections_count,
                entry.replacements_count,
                entry.failures_count,
                entry.dry_run,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}

//! Run report for pseudonymization
//!
//! Summarizes detections, assignments and failures across all documents of a run
//! and renders them for the console or as JSON.

use crate::pseudonym::assigner::AssignmentStats;
use crate::pseudonym::models::PseudonymizedText;
use serde::{Deserialize, Serialize};

/// Maximum number of before/after samples kept
const MAX_SAMPLES: usize = 20;

/// Pseudonymization run report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PseudonymizationReport {
    /// Documents processed
    pub documents: usize,

    /// Name occurrences detected
    pub detections: usize,

    /// Occurrences replaced by a pseudonym
    pub replacements: usize,

    /// Distinct names in the mapping at the end of the run
    pub distinct_names: usize,

    /// Assignment counters
    pub stats: AssignmentStats,

    /// Sample pseudonymizations (before/after)
    pub samples: Vec<PseudonymSample>,

    /// Warnings about occurrences kept unchanged
    pub warnings: Vec<String>,

    /// Whether the run left the text unchanged
    pub dry_run: bool,

    /// Total processing time (ms)
    pub total_processing_time_ms: u64,
}

/// Sample pseudonymization showing before/after
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PseudonymSample {
    /// Original name, masked after the first letter of each token
    pub original: String,
    pub pseudonym: String,
}

impl PseudonymizationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the results of one document
    pub fn add_document(&mut self, result: &PseudonymizedText) {
        self.documents += 1;
        self.detections += result.detection_count();
        self.replacements += result.replaced_count();
        self.total_processing_time_ms += result.processing_time_ms;
        self.dry_run |= result.dry_run;

        for replacement in &result.replacements {
            if self.samples.len() >= MAX_SAMPLES {
                break;
            }
            if let Some(ref pseudonym) = replacement.pseudonym {
                if self.samples.iter().any(|s| &s.pseudonym == pseudonym) {
                    continue;
                }
                self.samples.push(PseudonymSample {
                    original: mask_name(&replacement.original),
                    pseudonym: pseudonym.clone(),
                });
            }
        }

        for failure in &result.failures {
            self.add_warning(format!("{}: {}", result.document_id, failure));
        }
    }

    /// Record final assignment counters
    pub fn set_stats(&mut self, stats: AssignmentStats, distinct_names: usize) {
        self.stats = stats;
        self.distinct_names = distinct_names;
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        if self.dry_run {
            output.push_str("               PSEUDONYMIZATION DRY-RUN REPORT                 \n");
        } else {
            output.push_str("                  PSEUDONYMIZATION REPORT                      \n");
        }
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Documents Processed:         {}\n", self.documents));
        output.push_str(&format!("  Names Detected:              {}\n", self.detections));
        output.push_str(&format!("  Names Replaced:              {}\n", self.replacements));
        output.push_str(&format!("  Distinct Names:              {}\n", self.distinct_names));
        output.push_str(&format!(
            "  Processing Time:             {} ms\n",
            self.total_processing_time_ms
        ));
        output.push('\n');

        output.push_str("🔍 ASSIGNMENT\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  New Pseudonyms:              {}\n", self.stats.assigned));
        output.push_str(&format!("  Reused From Mapping:         {}\n", self.stats.cache_hits));
        output.push_str(&format!("  Catalog Tokens:              {}\n", self.stats.catalog_tokens));
        output.push_str(&format!("  Generated Tokens:            {}\n", self.stats.generated_tokens));
        output.push_str(&format!(
            "  Invalid Occurrences:         {}\n",
            self.stats.invalid_occurrences
        ));
        output.push('\n');

        if !self.samples.is_empty() {
            output.push_str("📝 SAMPLE PSEUDONYMS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for sample in self.samples.iter().take(10) {
                output.push_str(&format!("  {:30} → {}\n", sample.original, sample.pseudonym));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write report to file as JSON
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Keep the first letter of each token: `John Smith` → `J*** S****`
fn mask_name(name: &str) -> String {
    name.split_whitespace()
        .map(|token| {
            token
                .chars()
                .enumerate()
                .map(|(i, c)| if i == 0 || !c.is_alphabetic() { c } else { '*' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pseudonym::models::Replacement;

    fn document(id: &str, pairs: &[(&str, Option<&str>)]) -> PseudonymizedText {
        let replacements = pairs
            .iter()
            .map(|(original, pseudonym)| Replacement {
                original: original.to_string(),
                pseudonym: pseudonym.map(str::to_string),
                start: 0,
                end: original.len(),
            })
            .collect();
        PseudonymizedText::new(id.to_string(), String::new(), replacements, false)
    }

    #[test]
    fn test_report_creation() {
        let report = PseudonymizationReport::new();
        assert_eq!(report.documents, 0);
        assert_eq!(report.detections, 0);
        assert!(report.samples.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_add_document() {
        let mut report = PseudonymizationReport::new();
        let mut doc = document(
            "doc-1",
            &[
                ("John Smith", Some("Oliver Hartley")),
                ("John Smith", Some("Oliver Hartley")),
                ("Jane", None),
            ],
        );
        doc.failures.push("empty token shape".to_string());

        report.add_document(&doc);

        assert_eq!(report.documents, 1);
        assert_eq!(report.detections, 3);
        assert_eq!(report.replacements, 2);
        assert_eq!(report.samples.len(), 1);
        assert_eq!(report.samples[0].original, "J*** S****");
        assert_eq!(report.warnings, vec!["doc-1: empty token shape".to_string()]);
    }

    #[test]
    fn test_mask_name() {
        assert_eq!(mask_name("O'Brien"), "O'*****");
        assert_eq!(mask_name("SMITH, John"), "S****, J***");
    }

    #[test]
    fn test_format_console() {
        let mut report = PseudonymizationReport::new();
        report.documents = 2;
        report.detections = 5;
        report.stats.generated_tokens = 4;

        let output = report.format_console();
        assert!(output.contains("PSEUDONYMIZATION REPORT"));
        assert!(output.contains("Documents Processed:         2"));
        assert!(output.contains("Names Detected:              5"));
        assert!(output.contains("Generated Tokens:            4"));
    }

    #[test]
    fn test_format_console_dry_run() {
        let report = PseudonymizationReport {
            dry_run: true,
            ..PseudonymizationReport::default()
        };
        assert!(report.format_console().contains("DRY-RUN REPORT"));
    }
}

//! Main pseudonymization engine
//!
//! This module provides the [`PseudonymizationEngine`] that ties detection,
//! assignment, substitution and audit logging together for free-text documents.
//!
//! # Architecture
//!
//! The engine coordinates four components:
//! - **Detector**: finds name spans in the text ([`RegexNameDetector`] by default)
//! - **Assigner**: maps each name to a stable pseudonym
//! - **Audit Logger**: records every document with hashed originals
//! - **Report**: accumulates run statistics
//!
//! # Examples
//!
//! ```
//! use pseudonymizer::pseudonym::{PseudonymizationConfig, PseudonymizationEngine};
//!
//! let mut config = PseudonymizationConfig::default();
//! config.generator.seed = Some(7);
//! let mut engine = PseudonymizationEngine::new(config)?;
//!
//! let result = engine.pseudonymize_text("memo-1", "Notes: John Smith called. John Smith left.")?;
//! assert!(!result.text.contains("John Smith"));
//! assert_eq!(result.replaced_count(), 2);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::domain::{Gender, NameOccurrence, NameRole};
use crate::pseudonym::{
    assigner::PseudonymAssigner,
    audit::AuditLogger,
    catalog::NameCatalog,
    config::PseudonymizationConfig,
    detector::{regex::RegexNameDetector, NameDetector},
    format::FormatPreserver,
    generator::AlgorithmicGenerator,
    mapping::PseudonymMapping,
    models::{PseudonymizedText, Replacement},
    report::PseudonymizationReport,
};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Main pseudonymization engine
///
/// One engine holds one mapping: every document passed through the same engine
/// shares its pseudonyms.
pub struct PseudonymizationEngine {
    config: PseudonymizationConfig,
    detector: Box<dyn NameDetector>,
    assigner: PseudonymAssigner,
    format: FormatPreserver,
    audit_logger: Option<AuditLogger>,
    report: PseudonymizationReport,
}

impl PseudonymizationEngine {
    /// Create a new pseudonymization engine
    ///
    /// Builds the catalog (degrading to an empty one when the name list is
    /// missing or unreadable), the generator, the assigner, the detector, and the
    /// audit logger if enabled. A configured seed makes the run reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - A detector pattern does not compile
    /// - A configured mapping file exists but cannot be read
    /// - Audit logger initialization fails
    pub fn new(config: PseudonymizationConfig) -> Result<Self> {
        config
            .validate()
            .context("Invalid pseudonymization configuration")?;

        let (catalog_rng, generator_rng) = match config.generator.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        let catalog = match config.catalog.name_list {
            Some(ref path) => NameCatalog::load_or_empty(path, catalog_rng),
            None => NameCatalog::empty(catalog_rng),
        };
        let generator = AlgorithmicGenerator::new(generator_rng)
            .with_length_range(config.generator.min_length, config.generator.max_length);

        let mapping = match config.mapping.load_path {
            Some(ref path) => load_mapping(path)?,
            None => PseudonymMapping::new(),
        };

        let assigner = PseudonymAssigner::new(catalog, generator)
            .with_mapping(mapping)
            .with_forced_gender(config.assignment.forced_gender)
            .with_length_matching(config.assignment.match_length);

        let detector = RegexNameDetector::with_patterns(&config.detector.patterns)
            .context("Failed to build name detector")?;

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )?)
        } else {
            None
        };

        tracing::info!(
            catalog_names = assigner.catalog().len(),
            detector_patterns = detector.pattern_count(),
            seeded = config.generator.seed.is_some(),
            locale = %config.assignment.locale,
            dry_run = config.dry_run,
            "Pseudonymization engine ready"
        );

        Ok(Self {
            report: PseudonymizationReport::new(),
            config,
            detector: Box::new(detector),
            assigner,
            format: FormatPreserver::new(),
            audit_logger,
        })
    }

    /// Replace the name detector
    pub fn with_detector(mut self, detector: Box<dyn NameDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Pseudonymize one document
    ///
    /// Every detected name is replaced by its pseudonym; everything else passes
    /// through unchanged. An occurrence that cannot be pseudonymized keeps its
    /// original text and is reported in [`PseudonymizedText::failures`]. In
    /// dry-run mode names are still assigned and reported but the text is
    /// returned as is.
    ///
    /// # Errors
    ///
    /// Returns an error if detection fails or the audit entry cannot be written.
    pub fn pseudonymize_text(&mut self, document_id: &str, text: &str) -> Result<PseudonymizedText> {
        let start = Instant::now();

        let mut detected = self
            .detector
            .detect(text)
            .with_context(|| format!("Name detection failed for document {document_id}"))?;
        detected.sort_by_key(|name| (name.start, name.end));

        let mut replacements = Vec::with_capacity(detected.len());
        let mut failures = Vec::new();
        let mut last_end = 0;

        for name in detected {
            if !is_valid_span(text, name.start, name.end) || name.start < last_end {
                tracing::warn!(
                    document_id = %document_id,
                    start = name.start,
                    end = name.end,
                    "Skipping detected span that is out of range or overlaps a previous name"
                );
                failures.push(format!("bytes {}..{}: invalid span", name.start, name.end));
                continue;
            }
            last_end = name.end;

            let occurrence = self.resolve_gender(name.occurrence);
            let pseudonym = match self.assigner.assign(&occurrence) {
                Ok(pseudonym) => Some(pseudonym),
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(
                        document_id = %document_id,
                        start = name.start,
                        error = %e,
                        "Keeping original text for name occurrence"
                    );
                    failures.push(format!("bytes {}..{}: {}", name.start, name.end, e));
                    None
                }
                Err(e) => return Err(e.into()),
            };

            replacements.push(Replacement {
                original: occurrence.original_text,
                pseudonym,
                start: name.start,
                end: name.end,
            });
        }

        let output = if self.config.dry_run {
            text.to_string()
        } else {
            substitute(text, &replacements)
        };

        let mut result =
            PseudonymizedText::new(document_id.to_string(), output, replacements, self.config.dry_run);
        result.failures = failures;
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        if let Some(ref logger) = self.audit_logger {
            logger.log_document(&result)?;
        }
        self.report.add_document(&result);

        tracing::debug!(
            document_id = %document_id,
            detections = result.detection_count(),
            replaced = result.replaced_count(),
            failures = result.failures.len(),
            "Document pseudonymized"
        );

        Ok(result)
    }

    /// Fill in an unspecified gender from the catalog's given names
    fn resolve_gender(&self, occurrence: NameOccurrence) -> NameOccurrence {
        if self.assigner.forced_gender().is_some() || occurrence.gender != Gender::Unspecified {
            return occurrence;
        }

        let given = self
            .format
            .decompose_shape(&occurrence.original_text)
            .into_iter()
            .zip(occurrence.token_shape.iter())
            .find(|(_, role)| **role == NameRole::Given)
            .map(|((token, _), _)| token);

        match given.and_then(|token| self.assigner.catalog().infer_gender(&token)) {
            Some(gender) => occurrence.with_gender(gender),
            None => occurrence,
        }
    }

    /// Write the mapping to the configured save path
    ///
    /// Returns the path written, or `None` when no save path is configured or
    /// the run is a dry run.
    pub fn save_mapping(&self) -> Result<Option<PathBuf>> {
        let Some(ref path) = self.config.mapping.save_path else {
            return Ok(None);
        };
        if self.config.dry_run {
            tracing::info!(path = %path.display(), "Dry run, mapping not saved");
            return Ok(None);
        }

        self.save_mapping_to(path)?;
        Ok(Some(path.clone()))
    }

    /// Write the mapping to `path`
    pub fn save_mapping_to(&self, path: &Path) -> Result<()> {
        self.assigner
            .mapping()
            .save(path)
            .with_context(|| format!("Failed to save mapping to {}", path.display()))
    }

    /// Report for all documents processed so far
    pub fn report(&self) -> PseudonymizationReport {
        let mut report = self.report.clone();
        report.dry_run = self.config.dry_run;
        report.set_stats(self.assigner.stats(), self.assigner.mapping().len());
        report
    }

    pub fn mapping(&self) -> &PseudonymMapping {
        self.assigner.mapping()
    }

    pub fn config(&self) -> &PseudonymizationConfig {
        &self.config
    }

    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }
}

/// Load a mapping from a previous run; a missing file starts a new mapping
fn load_mapping(path: &Path) -> Result<PseudonymMapping> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Mapping file not found, starting a new mapping");
        return Ok(PseudonymMapping::new());
    }
    PseudonymMapping::load(path)
        .with_context(|| format!("Failed to load mapping from {}", path.display()))
}

/// Non-empty, in bounds, and on character boundaries
fn is_valid_span(text: &str, start: usize, end: usize) -> bool {
    start < end && end <= text.len() && text.is_char_boundary(start) && text.is_char_boundary(end)
}

/// Splice pseudonyms into `text`; spans must be sorted and disjoint
fn substitute(text: &str, replacements: &[Replacement]) -> String {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for replacement in replacements {
        let Some(ref pseudonym) = replacement.pseudonym else {
            continue;
        };
        output.push_str(&text[cursor..replacement.start]);
        output.push_str(pseudonym);
        cursor = replacement.end;
    }
    output.push_str(&text[cursor..]);
    output
}

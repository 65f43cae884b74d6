//! Pseudonymization configuration

use crate::domain::Gender;
use crate::pseudonym::generator::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shortest and longest token the generator is allowed to produce
const LENGTH_LIMITS: (usize, usize) = (2, 16);

/// Pseudonymization configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PseudonymizationConfig {
    /// Name list used as the pseudonym catalog
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Fallback name generator settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Assignment policy
    #[serde(default)]
    pub assignment: AssignmentConfig,

    /// Name detection patterns
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Mapping persistence across runs
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Dry-run mode (detect and assign, but leave the text unchanged)
    #[serde(default)]
    pub dry_run: bool,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl PseudonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.generator
            .validate()
            .context("Invalid generator configuration")?;
        self.assignment
            .validate()
            .context("Invalid assignment configuration")?;
        self.detector
            .validate()
            .context("Invalid detector configuration")?;
        self.audit.validate().context("Invalid audit configuration")?;

        if let Some(ref path) = self.catalog.name_list {
            if !path.exists() {
                tracing::warn!(
                    path = %path.display(),
                    "Name list not found, generated names will be used"
                );
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("PSEUDONYMIZER_NAME_LIST") {
            self.catalog.name_list = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_SEED") {
            self.generator.seed = Some(val.parse().context("Invalid PSEUDONYMIZER_SEED value")?);
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_MIN_LENGTH") {
            self.generator.min_length = val
                .parse()
                .context("Invalid PSEUDONYMIZER_MIN_LENGTH value")?;
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_MAX_LENGTH") {
            self.generator.max_length = val
                .parse()
                .context("Invalid PSEUDONYMIZER_MAX_LENGTH value")?;
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_GENDER") {
            self.assignment.forced_gender = Some(
                val.parse()
                    .map_err(anyhow::Error::msg)
                    .context("Invalid PSEUDONYMIZER_GENDER value")?,
            );
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_LOCALE") {
            self.assignment.locale = val;
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_MATCH_LENGTH") {
            self.assignment.match_length = val
                .parse()
                .context("Invalid PSEUDONYMIZER_MATCH_LENGTH value")?;
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_MAPPING_IN") {
            self.mapping.load_path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_MAPPING_OUT") {
            self.mapping.save_path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_DRY_RUN") {
            self.dry_run = val.parse().context("Invalid PSEUDONYMIZER_DRY_RUN value")?;
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// Name list configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the name list (`.txt`/`.csv` lines or `.toml`); missing means generated names only
    #[serde(default)]
    pub name_list: Option<PathBuf>,
}

/// Fallback generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Seed for reproducible runs; entropy-seeded when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        let (lower, upper) = LENGTH_LIMITS;
        if self.min_length < lower || self.max_length > upper {
            anyhow::bail!(
                "Generated name lengths must lie within {}..={} (got {}..={})",
                lower,
                upper,
                self.min_length,
                self.max_length
            );
        }
        if self.min_length > self.max_length {
            anyhow::bail!(
                "min_length ({}) must not exceed max_length ({})",
                self.min_length,
                self.max_length
            );
        }
        Ok(())
    }
}

/// Assignment policy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentConfig {
    /// Gender applied to every occurrence, overriding detection
    #[serde(default)]
    pub forced_gender: Option<Gender>,

    /// Locale tag recorded with the run (e.g. `en_US`)
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Generate tokens as long as the original ones
    #[serde(default = "default_true")]
    pub match_length: bool,
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            forced_gender: None,
            locale: default_locale(),
            match_length: default_true(),
        }
    }
}

impl AssignmentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.locale.trim().is_empty() {
            anyhow::bail!("locale must not be empty");
        }
        Ok(())
    }
}

/// Detector configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Regex patterns matching person names; empty means the built-in pattern
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.patterns {
            regex::Regex::new(pattern)
                .with_context(|| format!("Invalid name pattern: {pattern}"))?;
        }
        Ok(())
    }
}

/// Mapping persistence configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Mapping from a previous run to continue from
    #[serde(default)]
    pub load_path: Option<PathBuf>,

    /// Where to write the mapping after the run
    #[serde(default)]
    pub save_path: Option<PathBuf>,
}

/// Audit logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON lines for audit entries
    #[serde(default = "default_true")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/pseudonymization.log")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_true(),
        }
    }
}

impl AuditConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path must be set when audit logging is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("PSEUDONYMIZER_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid PSEUDONYMIZER_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("PSEUDONYMIZER_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid PSEUDONYMIZER_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}

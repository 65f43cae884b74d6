//! Domain error types
//!
//! This module defines the error hierarchy for the pseudonymizer.
//! Only configuration and I/O failures outside the core are ever fatal to a run;
//! the catalog and assignment errors are recovered from where they occur.

use crate::domain::name::{Gender, NameRole};
use thiserror::Error;

/// Main pseudonymizer error type
#[derive(Debug, Error)]
pub enum PseudonymError {
    /// The catalog has no record for the requested bucket (and no fallback bucket).
    ///
    /// Recoverable: the assigner falls back to the algorithmic generator.
    #[error("Catalog exhausted for {gender} {role} names")]
    CatalogExhausted { gender: Gender, role: NameRole },

    /// A name occurrence violates the caller contract (e.g. empty token shape).
    ///
    /// Fatal to that single occurrence only; the original text is kept.
    #[error("Invalid name occurrence: {0}")]
    InvalidOccurrence(String),

    /// The name catalog source could not be read or parsed
    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Name detection errors (bad detector pattern)
    #[error("Detection error: {0}")]
    Detection(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl PseudonymError {
    /// Whether the error is recovered from inside the core
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CatalogExhausted { .. } | Self::InvalidOccurrence(_) | Self::CatalogLoad(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PseudonymError {
    fn from(err: std::io::Error) -> Self {
        PseudonymError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PseudonymError {
    fn from(err: serde_json::Error) -> Self {
        PseudonymError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PseudonymError {
    fn from(err: toml::de::Error) -> Self {
        PseudonymError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PseudonymError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_catalog_exhausted_display() {
        let err = PseudonymError::CatalogExhausted {
            gender: Gender::Male,
            role: NameRole::Given,
        };
        assert_eq!(err.to_string(), "Catalog exhausted for male given names");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_configuration_error_not_recoverable() {
        let err = PseudonymError::Configuration("bad".to_string());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PseudonymError = io_err.into();
        assert!(matches!(err, PseudonymError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PseudonymError = json_err.into();
        assert!(matches!(err, PseudonymError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PseudonymError = toml_err.into();
        assert!(matches!(err, PseudonymError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = PseudonymError::InvalidOccurrence("empty shape".to_string());
        let _: &dyn std::error::Error = &err;
    }
}

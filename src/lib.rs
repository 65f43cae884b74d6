// Pseudonymizer - consistent name pseudonymization for text
// Copyright (c) 2025 Pseudonymizer Contributors
// Licensed under the MIT License

//! # Pseudonymizer
//!
//! Replaces person names in free text with realistic synthetic names while
//! keeping the text readable: every occurrence of the same name gets the same
//! pseudonym, and the pseudonym keeps the original's shape and capitalization.
//!
//! ## Overview
//!
//! This library provides:
//! - **Detecting** person names in text (regex based, pluggable)
//! - **Assigning** pseudonyms from a gender-aware name catalog
//! - **Generating** pronounceable names when the catalog has none to offer
//! - **Preserving** token structure and casing (`SMITH, John` → `HARTLEY, Oliver`)
//! - **Persisting** the name mapping so later runs stay consistent
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`pseudonym`] - Catalog, generator, assigner, detector and engine
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use pseudonymizer::pseudonym::{PseudonymizationConfig, PseudonymizationEngine};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut config = PseudonymizationConfig::default();
//! config.generator.seed = Some(42);
//!
//! let mut engine = PseudonymizationEngine::new(config)?;
//! let result = engine.pseudonymize_text("memo-1", "Notes: Jane Doe met Jane Doe.")?;
//!
//! assert_eq!(result.replacements[0].pseudonym, result.replacements[1].pseudonym);
//! # Ok(())
//! # }
//! ```
//!
//! ## Working with the assigner directly
//!
//! Callers with their own detector can feed [`domain::NameOccurrence`] values
//! straight into a [`pseudonym::PseudonymAssigner`]:
//!
//! ```rust
//! use pseudonymizer::domain::{Gender, NameOccurrence, NameRole};
//! use pseudonymizer::pseudonym::{AlgorithmicGenerator, NameCatalog, PseudonymAssigner};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let catalog = NameCatalog::from_lines(
//!     "Oliver,male,given\nHartley,unspecified,family\n",
//!     StdRng::seed_from_u64(1),
//! );
//! let generator = AlgorithmicGenerator::new(StdRng::seed_from_u64(2));
//! let mut assigner = PseudonymAssigner::new(catalog, generator);
//!
//! let occurrence = NameOccurrence::new(
//!     "SMITH, John",
//!     Gender::Male,
//!     vec![NameRole::Family, NameRole::Given],
//! );
//! assert_eq!(assigner.assign(&occurrence)?, "HARTLEY, Oliver");
//! # Ok::<(), pseudonymizer::domain::PseudonymError>(())
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`] with a [`domain::PseudonymError`];
//! the engine and CLI wrap them with `anyhow` context.
//!
//! ## Logging
//!
//! All components log through `tracing`:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(names = 120, "Name catalog loaded");
//! warn!(document_id = "memo-1", "Keeping original text for name occurrence");
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod pseudonym;

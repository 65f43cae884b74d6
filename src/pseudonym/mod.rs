//! Name pseudonymization
//!
//! Replaces detected person names with realistic, consistent pseudonyms. Each
//! distinct original name (compared after normalization) receives exactly one
//! pseudonym per run, drawn from a user-supplied name catalog or, when the
//! catalog has nothing suitable, from an algorithmic generator.
//!
//! # Architecture
//!
//! - **Catalog**: gender and role bucketed name list ([`NameCatalog`])
//! - **Generator**: pronounceable fallback names ([`AlgorithmicGenerator`])
//! - **Format**: token shape and casing preservation ([`FormatPreserver`])
//! - **Assigner**: consistent assignment with a mapping ([`PseudonymAssigner`])
//! - **Detector**: name span detection ([`detector::NameDetector`])
//! - **Engine**: end-to-end text processing ([`PseudonymizationEngine`])
//! - **Audit**: per-document entries with hashed originals
//!
//! # Usage
//!
//! ```rust,no_run
//! use pseudonymizer::pseudonym::{PseudonymizationConfig, PseudonymizationEngine};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = PseudonymizationConfig::default();
//! let mut engine = PseudonymizationEngine::new(config)?;
//! let result = engine.pseudonymize_text("letter-1", "Dear Mr Smith, ...")?;
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```

pub mod assigner;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod detector;
pub mod engine;
pub mod format;
pub mod generator;
pub mod mapping;
pub mod models;
pub mod report;

// Re-export main types
pub use assigner::{AssignmentStats, PseudonymAssigner, SharedPseudonymAssigner};
pub use catalog::NameCatalog;
pub use config::PseudonymizationConfig;
pub use engine::PseudonymizationEngine;
pub use format::FormatPreserver;
pub use generator::AlgorithmicGenerator;
pub use mapping::PseudonymMapping;
pub use models::{PseudonymizedText, Replacement};
pub use report::PseudonymizationReport;

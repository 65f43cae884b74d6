//! Configuration management for the pseudonymizer.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting, so the file itself is optional
//! - `PSEUDONYMIZER_*` environment overrides
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pseudonymizer::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pseudonymizer.toml")?;
//!
//! println!("Log level: {}", config.application.log_level);
//! if let Some(path) = &config.pseudonymization.catalog.name_list {
//!     println!("Name list: {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [pseudonymization.catalog]
//! name_list = "${PSEUDONYMIZER_DATA}/names.txt"
//!
//! [pseudonymization.generator]
//! seed = 42
//!
//! [pseudonymization.assignment]
//! forced_gender = "female"
//!
//! [pseudonymization.mapping]
//! save_path = "./mapping.json"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{default_config, load_config, load_or_default};
pub use schema::{ApplicationConfig, LoggingConfig, PseudonymizerConfig};

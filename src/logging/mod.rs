//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console logs on stderr, leaving stdout for document output
//! - JSON-formatted file logs with rotation
//! - Level selection via configuration, CLI flag or `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use pseudonymizer::logging::init_logging;
//! use pseudonymizer::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::warn!(document_id = "memo-1", "Name kept unchanged");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

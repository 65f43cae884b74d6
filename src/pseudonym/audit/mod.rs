//! Audit logging module
//!
//! Records one entry per pseudonymized document. Original names are stored only
//! as SHA-256 hashes keyed with a random per-logger secret.

pub mod logger;

pub use logger::AuditLogger;

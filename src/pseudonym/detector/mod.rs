//! Name detection module
//!
//! Provides the trait-based detection interface and a regex implementation for
//! locating person names in free text. Detection quality is deliberately simple;
//! anything that can produce [`DetectedName`] spans can drive the engine.

pub mod regex;

use crate::domain::{NameOccurrence, Result};

/// A name found in a text, with its byte span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedName {
    pub occurrence: NameOccurrence,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

/// Trait for name detection implementations
pub trait NameDetector: Send + Sync {
    /// Detect names in `text`
    ///
    /// Returned spans are sorted by start offset and never overlap.
    fn detect(&self, text: &str) -> Result<Vec<DetectedName>>;
}

//! Domain models and types for the pseudonymizer.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Name types** ([`Gender`], [`NameRole`], [`NameRecord`], [`NameOccurrence`])
//! - **Error types** ([`PseudonymError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible core operations return [`Result<T, PseudonymError>`]:
//!
//! ```rust
//! use pseudonymizer::domain::{NameOccurrence, Gender, NameRole, Result};
//!
//! fn example() -> Result<NameOccurrence> {
//!     Ok(NameOccurrence::new("John Smith", Gender::Male, vec![NameRole::Given, NameRole::Family]))
//! }
//! ```

pub mod errors;
pub mod name;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::PseudonymError;
pub use name::{Gender, NameOccurrence, NameRecord, NameRole};
pub use result::Result;

//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the pseudonymizer configuration file.

use crate::config::load_or_default;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        match config_path {
            Some(path) => {
                tracing::info!(config_path = %path.display(), "Validating configuration");
                println!("🔍 Validating configuration file: {}", path.display());
            }
            None => {
                tracing::info!("Validating built-in defaults");
                println!("🔍 No configuration file given, validating built-in defaults");
            }
        }
        println!();

        // Loading validates as well
        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        let p = &config.pseudonymization;
        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Name List: {}",
            p.catalog
                .name_list
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(none, generated names only)".to_string())
        );
        println!(
            "  Forced Gender: {}",
            p.assignment
                .forced_gender
                .map(|g| g.to_string())
                .unwrap_or_else(|| "(detected)".to_string())
        );
        println!("  Locale: {}", p.assignment.locale);
        println!(
            "  Generated Length: {}..={}",
            p.generator.min_length, p.generator.max_length
        );
        println!(
            "  Seed: {}",
            p.generator
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(random)".to_string())
        );
        println!("  Detector Patterns: {}", p.detector.patterns.len().max(1));
        println!("  Dry Run: {}", config.effective_pseudonymization().dry_run);
        println!("  Audit Log: {}", p.audit.enabled);
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_defaults() {
        let args = ValidateArgs {};
        assert_eq!(args.execute(None).unwrap(), 0);
    }

    #[test]
    fn test_validate_missing_file() {
        let args = ValidateArgs {};
        assert_eq!(args.execute(Some(Path::new("/nonexistent/pseudonymizer.toml"))).unwrap(), 2);
    }

    #[test]
    fn test_validate_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[pseudonymization.generator]\nmin_length = 20\n").unwrap();
        file.flush().unwrap();

        let args = ValidateArgs {};
        assert_eq!(args.execute(Some(file.path())).unwrap(), 2);
    }
}

//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "pseudonymizer.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing pseudonymizer configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point pseudonymization.catalog.name_list at your name list");
                println!(
                    "  3. Validate configuration: pseudonymizer --config {} validate-config",
                    self.output
                );
                println!(
                    "  4. Run: pseudonymizer --config {} pseudonymize input.txt output.txt",
                    self.output
                );
                println!();
                Ok(0)
            }
            Err(e) => {
                tracing::error!(output = %self.output, error = %e, "Failed to write configuration file");
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(2)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Pseudonymizer Configuration File

[application]
log_level = "info"
dry_run = false

[pseudonymization.catalog]
# name_list = "./names.txt"

[pseudonymization.generator]
min_length = 3
max_length = 10

[pseudonymization.assignment]
locale = "en_US"
match_length = true

[pseudonymization.mapping]
# save_path = "./mapping.json"

[pseudonymization.audit]
enabled = false

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Pseudonymizer Configuration File
#
# Replaces person names in text with consistent synthetic names.
# Every setting below is optional; the values shown are the defaults.
#
# Values may reference environment variables with ${VAR_NAME}, and any
# setting can be overridden with a PSEUDONYMIZER_* environment variable.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (detect names but write the text unchanged)
dry_run = false

# ============================================================================
# Name Catalog
# ============================================================================
[pseudonymization.catalog]
# Name list used for pseudonyms. Without one, names are generated.
#
# Plain text (.txt/.csv), one entry per line:
#   Oliver,male,given
#   Amelia,female,given
#   Hartley,unspecified,family
#   Robin Ashdown            # full name: first token given, last token family
#
# TOML (.toml):
#   [[names]]
#   text = "Oliver"
#   gender = "male"
#   role = "given"
#
# name_list = "${PSEUDONYMIZER_DATA}/names.txt"

# ============================================================================
# Name Generator (used when the catalog has no suitable name)
# ============================================================================
[pseudonymization.generator]
# Length range for generated names (2-16)
min_length = 3
max_length = 10

# Seed for reproducible output; omit for a fresh random run
# seed = 42

# ============================================================================
# Assignment Policy
# ============================================================================
[pseudonymization.assignment]
# Use one gender for every pseudonym (male, female)
# forced_gender = "female"

# Locale tag recorded with the run
locale = "en_US"

# Generate names as long as the originals
match_length = true

# ============================================================================
# Name Detection
# ============================================================================
[pseudonymization.detector]
# Regex patterns matching names; empty uses two capitalized words
patterns = []

# ============================================================================
# Mapping Persistence
# ============================================================================
[pseudonymization.mapping]
# Continue from the mapping of a previous run
# load_path = "./mapping.json"

# Save the mapping after the run
# save_path = "./mapping.json"

# ============================================================================
# Audit Log (original names are stored as SHA-256 hashes only)
# ============================================================================
[pseudonymization.audit]
enabled = false
log_path = "./audit/pseudonymization.log"
json_format = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging in addition to the console
local_enabled = false

# Log directory
local_path = "./logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PseudonymizerConfig;
    use tempfile::tempdir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "pseudonymizer.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "pseudonymizer.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_are_valid() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config: PseudonymizerConfig = toml::from_str(&content).unwrap();
            assert!(config.validate().is_ok());
            assert_eq!(config.pseudonymization.assignment.locale, "en_US");
        }
    }

    #[test]
    fn test_execute_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pseudonymizer.toml");
        std::fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# existing");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().unwrap(), 0);
        assert!(std::fs::read_to_string(&path).unwrap().contains("[pseudonymization.generator]"));
    }
}

//! Pseudonymize command implementation
//!
//! This module implements the `pseudonymize` command, which reads one text
//! document, replaces every detected name and writes the result. Status output
//! goes to stderr because stdout may carry the document itself.

use crate::config::load_or_default;
use crate::domain::Gender;
use crate::pseudonym::{PseudonymizationConfig, PseudonymizationEngine};
use anyhow::Context;
use clap::Args;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Marker for stdin/stdout in place of a file path
const STDIO: &str = "-";

/// Arguments for the pseudonymize command
#[derive(Args, Debug)]
pub struct PseudonymizeArgs {
    /// Input text file (`-` for stdin)
    pub input: String,

    /// Output text file (`-` for stdout)
    pub output: String,

    /// Name list to draw pseudonyms from
    #[arg(short = 'n', long)]
    pub name_list: Option<PathBuf>,

    /// Use this gender for every pseudonym (male, female)
    #[arg(short, long)]
    pub gender: Option<Gender>,

    /// Locale tag recorded with the run (e.g. en_US)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Seed for reproducible pseudonyms
    #[arg(long)]
    pub seed: Option<u64>,

    /// Mapping file from a previous run to continue from
    #[arg(long, value_name = "PATH")]
    pub mapping_in: Option<PathBuf>,

    /// Write the final mapping to this file
    #[arg(long, value_name = "PATH")]
    pub mapping_out: Option<PathBuf>,

    /// Detect and assign, but write the text unchanged
    #[arg(long)]
    pub dry_run: bool,

    /// Print a run report when done
    #[arg(long)]
    pub report: bool,
}

impl PseudonymizeArgs {
    /// Execute the pseudonymize command
    pub fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, output = %self.output, "Starting pseudonymize command");

        let config = match load_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load configuration");
                eprintln!("   Error: {e}");
                return Ok(1);
            }
        };

        let pseudonymization = self.apply_overrides(config.effective_pseudonymization());

        let text = match read_input(&self.input) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(input = %self.input, error = %e, "Failed to read input");
                eprintln!("❌ Failed to read input: {}", self.input);
                eprintln!("   Error: {e:#}");
                return Ok(1);
            }
        };

        let mut engine = match PseudonymizationEngine::new(pseudonymization) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ Invalid pseudonymization settings");
                eprintln!("   Error: {e:#}");
                return Ok(1);
            }
        };

        let document_id = if self.input == STDIO {
            "stdin"
        } else {
            self.input.as_str()
        };
        let result = engine.pseudonymize_text(document_id, &text)?;

        if let Err(e) = write_output(&self.output, &result.text) {
            tracing::error!(output = %self.output, error = %e, "Failed to write output");
            eprintln!("❌ Failed to write output: {}", self.output);
            eprintln!("   Error: {e:#}");
            return Ok(1);
        }

        if let Some(path) = engine.save_mapping()? {
            eprintln!("💾 Mapping saved: {}", path.display());
        }

        if engine.is_dry_run() {
            eprintln!(
                "🔍 Dry run: {} names detected, text left unchanged",
                result.detection_count()
            );
        } else {
            eprintln!(
                "✅ Pseudonymized {} of {} names",
                result.replaced_count(),
                result.detection_count()
            );
        }
        for failure in &result.failures {
            eprintln!("⚠️  Kept original name ({failure})");
        }

        if self.report {
            eprint!("{}", engine.report().format_console());
        }

        Ok(0)
    }

    /// Fold command-line flags into the configured settings
    fn apply_overrides(&self, mut config: PseudonymizationConfig) -> PseudonymizationConfig {
        if let (Some(_), Some(gender)) = (&self.name_list, self.gender) {
            tracing::warn!(gender = %gender, "Both a name list and a gender were given; the gender filters the list");
            eprintln!("⚠️  Both --name-list and --gender given: only {gender} names will be drawn from the list");
        }

        if let Some(ref path) = self.name_list {
            config.catalog.name_list = Some(path.clone());
        }
        if let Some(gender) = self.gender {
            config.assignment.forced_gender = Some(gender);
        }
        if let Some(ref locale) = self.locale {
            config.assignment.locale = locale.clone();
        }
        if let Some(seed) = self.seed {
            config.generator.seed = Some(seed);
        }
        if let Some(ref path) = self.mapping_in {
            config.mapping.load_path = Some(path.clone());
        }
        if let Some(ref path) = self.mapping_out {
            config.mapping.save_path = Some(path.clone());
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.dry_run = true;
        }

        config
    }
}

/// Read the whole input as UTF-8, replacing invalid sequences
fn read_input(input: &str) -> anyhow::Result<String> {
    let bytes = if input == STDIO {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        std::fs::read(input).with_context(|| format!("Failed to read {input}"))?
    };

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(input = %input, "Input is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

fn write_output(output: &str, text: &str) -> anyhow::Result<()> {
    if output == STDIO {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush())
            .context("Failed to write stdout")?;
    } else {
        std::fs::write(output, text).with_context(|| format!("Failed to write {output}"))?;
    }
    Ok(())
}

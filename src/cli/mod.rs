//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the pseudonymizer using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pseudonymizer - replace person names with consistent synthetic names
#[derive(Parser, Debug)]
#[command(name = "pseudonymizer")]
#[command(version, about, long_about = None)]
#[command(author = "Pseudonymizer Contributors")]
pub struct Cli {
    /// Path to configuration file (optional, built-in defaults otherwise)
    #[arg(short, long, env = "PSEUDONYMIZER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PSEUDONYMIZER_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace the names in a text file with pseudonyms
    Pseudonymize(commands::pseudonymize::PseudonymizeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;

    #[test]
    fn test_cli_parse_pseudonymize() {
        let cli = Cli::parse_from(["pseudonymizer", "pseudonymize", "in.txt", "out.txt"]);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Pseudonymize(args) => {
                assert_eq!(args.input, "in.txt");
                assert_eq!(args.output, "out.txt");
                assert!(args.gender.is_none());
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_pseudonymize_flags() {
        let cli = Cli::parse_from([
            "pseudonymizer",
            "pseudonymize",
            "-n",
            "names.txt",
            "-g",
            "female",
            "-l",
            "de_DE",
            "--seed",
            "42",
            "--mapping-out",
            "map.json",
            "--dry-run",
            "-",
            "-",
        ]);
        match cli.command {
            Commands::Pseudonymize(args) => {
                assert_eq!(args.name_list, Some(PathBuf::from("names.txt")));
                assert_eq!(args.gender, Some(Gender::Female));
                assert_eq!(args.locale.as_deref(), Some("de_DE"));
                assert_eq!(args.seed, Some(42));
                assert_eq!(args.mapping_out, Some(PathBuf::from("map.json")));
                assert!(args.dry_run);
                assert_eq!(args.input, "-");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_gender() {
        let result = Cli::try_parse_from([
            "pseudonymizer",
            "pseudonymize",
            "-g",
            "robot",
            "in.txt",
            "out.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["pseudonymizer", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["pseudonymizer", "validate-config", "--log-level", "debug"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["pseudonymizer", "init", "-o", "custom.toml", "--force"]);
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.output, "custom.toml");
                assert!(args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

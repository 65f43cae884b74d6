// Pseudonymizer - consistent name pseudonymization for text
// Copyright (c) 2025 Pseudonymizer Contributors
// Licensed under the MIT License

use clap::Parser;
use pseudonymizer::cli::{Cli, Commands};
use pseudonymizer::config::{load_or_default, LoggingConfig};
use pseudonymizer::logging::init_logging;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the configuration when it loads; commands
    // report configuration errors themselves.
    let (config_level, logging_config) = match load_or_default(cli.config.as_deref()) {
        Ok(config) => (config.application.log_level, config.logging),
        Err(_) => ("info".to_string(), LoggingConfig::default()),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Pseudonymizer starting");

    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            1
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Pseudonymize(args) => args.execute(cli.config.as_deref()),
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref()),
        Commands::Init(args) => args.execute(),
    }
}

//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PseudonymizerConfig;
use crate::domain::errors::PseudonymError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PseudonymizerConfig
/// 4. Applies environment variable overrides (PSEUDONYMIZER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`PseudonymError::Configuration`] if the file cannot be read or
/// parsed, a referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use pseudonymizer::config::loader::load_config;
///
/// let config = load_config("pseudonymizer.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PseudonymizerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PseudonymError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PseudonymError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: PseudonymizerConfig = toml::from_str(&contents)
        .map_err(|e| PseudonymError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finalize(config)
}

/// Built-in defaults with environment overrides applied, for runs without a file
pub fn default_config() -> Result<PseudonymizerConfig> {
    finalize(PseudonymizerConfig::default())
}

/// Load `path` when given, otherwise fall back to [`default_config`]
pub fn load_or_default(path: Option<&Path>) -> Result<PseudonymizerConfig> {
    match path {
        Some(path) => load_config(path),
        None => default_config(),
    }
}

fn finalize(mut config: PseudonymizerConfig) -> Result<PseudonymizerConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        PseudonymError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PseudonymError::Configuration(format!("Invalid placeholder pattern: {}", e)))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PseudonymError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the PSEUDONYMIZER_* prefix
///
/// Application and logging keys follow `PSEUDONYMIZER_<SECTION>_<KEY>`;
/// pseudonymization keys are documented on
/// [`PseudonymizationConfig::apply_env_overrides`](crate::pseudonym::config::PseudonymizationConfig::apply_env_overrides).
fn apply_env_overrides(config: &mut PseudonymizerConfig) -> Result<()> {
    if let Ok(val) = std::env::var("PSEUDONYMIZER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("PSEUDONYMIZER_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("PSEUDONYMIZER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PSEUDONYMIZER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("PSEUDONYMIZER_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    config
        .pseudonymization
        .apply_env_overrides()
        .map_err(|e| PseudonymError::Configuration(format!("{e:#}")))?;

    Ok(())
}

// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{validate_config, ConfigError, ConfigResult, ThermalConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "thermoguard.toml";
const CONFIG_PATH_ENV: &str = "THERMOGUARD_CONFIG_PATH";

/// Find the thermoguard configuration file
///
/// Search order:
/// 1. `THERMOGUARD_CONFIG_PATH` environment variable
/// 2. Current working directory: `./thermoguard.toml`
/// 3. Ancestor directories (searches up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by {} not found: {}",
                CONFIG_PATH_ENV,
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<ThermalConfig> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => find_config_file()?,
    };

    let contents = fs::read_to_string(&path)?;
    let mut config: ThermalConfig = toml::from_str(&contents)?;

    apply_environment_overrides(&mut config)?;

    if let Some(args) = cli_args {
        apply_cli_overrides(&mut config, args)?;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides to a loaded configuration
///
/// Recognized variables: `THERMOGUARD_SENSOR_ID`, `THERMOGUARD_CHECK_INTERVAL_MS`,
/// `THERMOGUARD_ENABLED`.
pub fn apply_environment_overrides(config: &mut ThermalConfig) -> ConfigResult<()> {
    if let Ok(raw) = env::var("THERMOGUARD_SENSOR_ID") {
        config.sensor_id = parse_override("sensor_id", &raw)?;
    }
    if let Ok(raw) = env::var("THERMOGUARD_CHECK_INTERVAL_MS") {
        config.check_interval_ms = parse_override("check_interval_ms", &raw)?;
    }
    if let Ok(raw) = env::var("THERMOGUARD_ENABLED") {
        config.enabled = parse_bool_override("enabled", &raw)?;
    }
    Ok(())
}

/// Apply CLI argument overrides to a loaded configuration
///
/// Recognized keys mirror the environment overrides: `sensor_id`,
/// `check_interval_ms`, `enabled`.
pub fn apply_cli_overrides(
    config: &mut ThermalConfig,
    args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(raw) = args.get("sensor_id") {
        config.sensor_id = parse_override("sensor_id", raw)?;
    }
    if let Some(raw) = args.get("check_interval_ms") {
        config.check_interval_ms = parse_override("check_interval_ms", raw)?;
    }
    if let Some(raw) = args.get("enabled") {
        config.enabled = parse_bool_override("enabled", raw)?;
    }
    Ok(())
}

fn parse_override<T: std::str::FromStr>(field: &str, raw: &str) -> ConfigResult<T> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidOverride {
        field: field.to_string(),
        reason: format!("cannot parse '{}'", raw),
    })
}

fn parse_bool_override(field: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidOverride {
            field: field.to_string(),
            reason: format!("cannot parse '{}' as boolean", other),
        }),
    }
}

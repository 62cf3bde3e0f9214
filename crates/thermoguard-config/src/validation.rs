// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent, within valid ranges, and don't conflict with each other.

use crate::{ConfigError, ConfigResult, ThermalConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    TierOrderInverted {
        lower: String,
        upper: String,
        lower_value: i32,
        upper_value: i32,
    },
    CapOrderInverted {
        lower: String,
        upper: String,
        lower_khz: u32,
        upper_khz: u32,
    },
    InvalidValue {
        field: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TierOrderInverted {
                lower,
                upper,
                lower_value,
                upper_value,
            } => {
                write!(
                    f,
                    "Tier trip temperatures out of order: {} = {} must be below {} = {}",
                    lower, lower_value, upper, upper_value
                )
            }
            Self::CapOrderInverted {
                lower,
                upper,
                lower_khz,
                upper_khz,
            } => {
                write!(
                    f,
                    "Tier frequency caps out of order: {} = {} kHz must be above {} = {} kHz",
                    lower, lower_khz, upper, upper_khz
                )
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Positive hysteresis band (each tier's clear point stays below its trip point)
/// - Tier trip temperatures strictly increasing low < mid < max
/// - Tier frequency caps strictly decreasing low > mid > max
/// - Positive polling interval and restore frequencies
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &ThermalConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_band(config, &mut errors);
    validate_tier_ordering(config, &mut errors);
    validate_value_ranges(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_band(config: &ThermalConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.hysteresis_band <= 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "hysteresis_band".to_string(),
            reason: "must be positive so each clear point is below its trip point".to_string(),
        });
    }
}

fn validate_tier_ordering(config: &ThermalConfig, errors: &mut Vec<ConfigValidationError>) {
    let trips = [
        ("low.trip_high", config.low.trip_high, "mid.trip_high", config.mid.trip_high),
        ("mid.trip_high", config.mid.trip_high, "max.trip_high", config.max.trip_high),
    ];
    for (lower, lower_value, upper, upper_value) in trips {
        if lower_value >= upper_value {
            errors.push(ConfigValidationError::TierOrderInverted {
                lower: lower.to_string(),
                upper: upper.to_string(),
                lower_value,
                upper_value,
            });
        }
    }

    // lower tier means higher cap: less restrictive
    let caps = [
        ("low.freq_khz", config.low.freq_khz, "mid.freq_khz", config.mid.freq_khz),
        ("mid.freq_khz", config.mid.freq_khz, "max.freq_khz", config.max.freq_khz),
    ];
    for (lower, lower_khz, upper, upper_khz) in caps {
        if lower_khz <= upper_khz {
            errors.push(ConfigValidationError::CapOrderInverted {
                lower: lower.to_string(),
                upper: upper.to_string(),
                lower_khz,
                upper_khz,
            });
        }
    }
}

fn validate_value_ranges(config: &ThermalConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.check_interval_ms == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "check_interval_ms".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if config.fallback_khz == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "fallback_khz".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    for (field, khz) in [
        ("low.freq_khz", config.low.freq_khz),
        ("mid.freq_khz", config.mid.freq_khz),
        ("max.freq_khz", config.max.freq_khz),
    ] {
        if khz == 0 {
            errors.push(ConfigValidationError::InvalidValue {
                field: field.to_string(),
                reason: "must be positive".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThermalConfig;

    #[test]
    fn test_default_config_is_valid() {
        let config = ThermalConfig::default();
        let result = validate_config(&config);
        if let Err(e) = &result {
            eprintln!("Validation error: {}", e);
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_band_rejected() {
        let mut config = ThermalConfig::default();
        config.hysteresis_band = 0;

        let result = validate_config(&config);
        assert!(result.is_err());

        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("hysteresis_band"));
        }
    }

    #[test]
    fn test_inverted_trip_order_rejected() {
        let mut config = ThermalConfig::default();
        config.mid.trip_high = 80; // above max.trip_high = 76

        let result = validate_config(&config);
        assert!(result.is_err());

        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("mid.trip_high"));
            assert!(msg.contains("max.trip_high"));
        }
    }

    #[test]
    fn test_inverted_cap_order_rejected() {
        let mut config = ThermalConfig::default();
        config.low.freq_khz = 100_000; // below mid cap

        let result = validate_config(&config);
        assert!(result.is_err());

        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("low.freq_khz"));
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = ThermalConfig::default();
        config.check_interval_ms = 0;

        let result = validate_config(&config);
        assert!(result.is_err());

        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("check_interval_ms"));
        }
    }
}

// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Live tunable surface
//!
//! Runtime read/write access to a small set of named parameters. Only
//! `enabled` is writable: writing `false` tears the governor down, writing
//! `true` sets the flag without re-arming the loop. The remaining tunables
//! are fixed after initialization and readable only.

use crate::runner::ThermalGovernor;
use thiserror::Error;

/// Tunable surface errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("unknown parameter '{0}'")]
    Unknown(String),

    #[error("parameter '{0}' is read-only after initialization")]
    ReadOnly(String),

    #[error("invalid value '{value}' for parameter '{name}'")]
    InvalidValue { name: String, value: String },
}

/// Read a recognized parameter as a string
pub fn get(governor: &ThermalGovernor, name: &str) -> Result<String, ParamError> {
    let config = governor.config();
    match name {
        "enabled" => Ok(if governor.is_enabled() { "1" } else { "0" }.to_string()),
        "allowed_max_high" => Ok(config.max.trip_high.to_string()),
        "allowed_max_freq" => Ok(config.max.freq_khz.to_string()),
        "check_interval_ms" => Ok(config.check_interval_ms.to_string()),
        other => Err(ParamError::Unknown(other.to_string())),
    }
}

/// Write a recognized parameter
pub fn set(governor: &mut ThermalGovernor, name: &str, value: &str) -> Result<(), ParamError> {
    match name {
        "enabled" => {
            let enabled = parse_bool(name, value)?;
            governor.set_enabled(enabled);
            Ok(())
        }
        "allowed_max_high" | "allowed_max_freq" | "check_interval_ms" => {
            Err(ParamError::ReadOnly(name.to_string()))
        }
        other => Err(ParamError::Unknown(other.to_string())),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ParamError> {
    match value.trim() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ParamError::InvalidValue {
            name: name.to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use thermoguard_config::ThermalConfig;
    use thermoguard_hal::mock::{MockCpufreq, MockSensor};

    fn governor() -> ThermalGovernor {
        let sensor = Arc::new(MockSensor::new(60));
        let backend = Arc::new(MockCpufreq::new(2, 1_512_000));
        ThermalGovernor::new(ThermalConfig::default(), sensor, backend)
    }

    #[test]
    fn test_read_defaults() {
        let gov = governor();
        assert_eq!(gov.get_param("enabled").unwrap(), "1");
        assert_eq!(gov.get_param("allowed_max_high").unwrap(), "76");
        assert_eq!(gov.get_param("allowed_max_freq").unwrap(), "384000");
        assert_eq!(gov.get_param("check_interval_ms").unwrap(), "1000");
    }

    #[test]
    fn test_unknown_parameter() {
        let mut gov = governor();
        assert_eq!(
            gov.get_param("poll_hz").unwrap_err(),
            ParamError::Unknown("poll_hz".to_string())
        );
        assert!(matches!(
            gov.set_param("poll_hz", "10").unwrap_err(),
            ParamError::Unknown(_)
        ));
    }

    #[test]
    fn test_declared_tunables_are_read_only() {
        let mut gov = governor();
        for name in ["allowed_max_high", "allowed_max_freq", "check_interval_ms"] {
            assert_eq!(
                gov.set_param(name, "1").unwrap_err(),
                ParamError::ReadOnly(name.to_string())
            );
        }
    }

    #[test]
    fn test_enabled_write_round_trip() {
        let mut gov = governor();
        gov.set_param("enabled", "false").unwrap();
        assert_eq!(gov.get_param("enabled").unwrap(), "0");
        gov.set_param("enabled", "1").unwrap();
        assert_eq!(gov.get_param("enabled").unwrap(), "1");
    }

    #[test]
    fn test_bad_boolean_rejected() {
        let mut gov = governor();
        assert!(matches!(
            gov.set_param("enabled", "maybe").unwrap_err(),
            ParamError::InvalidValue { .. }
        ));
    }
}

// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines the configuration structs that map to sections in
//! `thermoguard.toml`, with defaults taken from the stock three-tier
//! throttling profile.

use serde::{Deserialize, Serialize};

/// Default temperature sensor id
pub const DEF_TEMP_SENSOR: u32 = 0;

/// Default sampling interval in milliseconds
pub const DEF_THERMAL_CHECK_MS: u64 = 1000;

/// Default hysteresis band width in degrees Celsius
pub const DEF_HYSTERESIS_BAND: i32 = 4;

/// Low tier defaults: trip temperature and frequency cap
pub const DEF_ALLOWED_LOW_HIGH: i32 = 70;
pub const DEF_ALLOWED_LOW_FREQ: u32 = 972_000;

/// Mid tier defaults
pub const DEF_ALLOWED_MID_HIGH: i32 = 72;
pub const DEF_ALLOWED_MID_FREQ: u32 = 648_000;

/// Max tier defaults: the highest thermal limit
pub const DEF_ALLOWED_MAX_HIGH: i32 = 76;
pub const DEF_ALLOWED_MAX_FREQ: u32 = 384_000;

/// Restore target used when no pre-throttle ceiling was ever captured
pub const DEF_FALLBACK_FREQ: u32 = 1_566_000;

/// One throttling tier: trip temperature and the ceiling it enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Temperature at or above which the tier activates (degrees Celsius)
    pub trip_high: i32,
    /// Frequency ceiling enforced while the tier is active (kHz)
    pub freq_khz: u32,
}

fn default_low_tier() -> TierConfig {
    TierConfig {
        trip_high: DEF_ALLOWED_LOW_HIGH,
        freq_khz: DEF_ALLOWED_LOW_FREQ,
    }
}

fn default_mid_tier() -> TierConfig {
    TierConfig {
        trip_high: DEF_ALLOWED_MID_HIGH,
        freq_khz: DEF_ALLOWED_MID_FREQ,
    }
}

fn default_max_tier() -> TierConfig {
    TierConfig {
        trip_high: DEF_ALLOWED_MAX_HIGH,
        freq_khz: DEF_ALLOWED_MAX_FREQ,
    }
}

fn default_sensor_id() -> u32 {
    DEF_TEMP_SENSOR
}

fn default_check_interval_ms() -> u64 {
    DEF_THERMAL_CHECK_MS
}

fn default_hysteresis_band() -> i32 {
    DEF_HYSTERESIS_BAND
}

fn default_fallback_khz() -> u32 {
    DEF_FALLBACK_FREQ
}

fn default_enabled() -> bool {
    true
}

/// Root configuration structure for the thermal governor
///
/// The tier clear points are derived, not configured: each tier deactivates
/// below `trip_high - hysteresis_band`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThermalConfig {
    /// Temperature sensor id to sample each cycle
    #[serde(default = "default_sensor_id")]
    pub sensor_id: u32,

    /// Polling interval in milliseconds
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,

    /// Whether throttling enforcement is active
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Hysteresis band width (degrees below trip_high at which a tier clears)
    #[serde(default = "default_hysteresis_band")]
    pub hysteresis_band: i32,

    /// Restore target when the pre-throttle ceiling is unknown (kHz)
    #[serde(default = "default_fallback_khz")]
    pub fallback_khz: u32,

    /// Least restrictive tier
    #[serde(default = "default_low_tier")]
    pub low: TierConfig,

    /// Middle tier
    #[serde(default = "default_mid_tier")]
    pub mid: TierConfig,

    /// Most restrictive tier
    #[serde(default = "default_max_tier")]
    pub max: TierConfig,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            sensor_id: default_sensor_id(),
            check_interval_ms: default_check_interval_ms(),
            enabled: default_enabled(),
            hysteresis_band: default_hysteresis_band(),
            fallback_khz: default_fallback_khz(),
            low: default_low_tier(),
            mid: default_mid_tier(),
            max: default_max_tier(),
        }
    }
}

impl ThermalConfig {
    /// Clear temperature for a tier: `trip_high - hysteresis_band`
    pub fn trip_low(&self, tier: &TierConfig) -> i32 {
        tier.trip_high - self.hysteresis_band
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_profile() {
        let config = ThermalConfig::default();
        assert_eq!(config.low.trip_high, 70);
        assert_eq!(config.low.freq_khz, 972_000);
        assert_eq!(config.mid.trip_high, 72);
        assert_eq!(config.mid.freq_khz, 648_000);
        assert_eq!(config.max.trip_high, 76);
        assert_eq!(config.max.freq_khz, 384_000);
        assert_eq!(config.check_interval_ms, 1000);
        assert!(config.enabled);
    }

    #[test]
    fn test_trip_low_derivation() {
        let config = ThermalConfig::default();
        assert_eq!(config.trip_low(&config.low), 66);
        assert_eq!(config.trip_low(&config.mid), 68);
        assert_eq!(config.trip_low(&config.max), 72);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ThermalConfig = toml::from_str(
            r#"
            sensor_id = 3
            [max]
            trip_high = 80
            freq_khz = 400000
            "#,
        )
        .unwrap();
        assert_eq!(config.sensor_id, 3);
        assert_eq!(config.max.trip_high, 80);
        assert_eq!(config.low.trip_high, 70);
        assert_eq!(config.check_interval_ms, 1000);
    }
}

// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Thermoguard
//!
//! Tiered hysteresis CPU thermal throttling governor.
//!
//! A periodic control loop samples one temperature sensor and caps the
//! maximum CPU frequency through three escalating tiers (low, mid, max).
//! Each tier trips at its high threshold and clears only after the
//! temperature drops a full hysteresis band below it, so a temperature
//! hovering near a threshold never makes the cap oscillate.
//!
//! This umbrella crate re-exports the workspace members:
//!
//! - [`config`]: TOML configuration with environment and CLI overrides
//! - [`hal`]: sensor and cpufreq traits, sysfs and mock implementations
//! - [`governor`]: the tier engine, throttle state, and polling loop
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use thermoguard::config::load_config;
//! use thermoguard::governor::ThermalGovernor;
//! use thermoguard::hal::mock::{MockCpufreq, MockSensor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None, None)?;
//! let sensor = Arc::new(MockSensor::new(60));
//! let backend = Arc::new(MockCpufreq::new(4, 1_512_000));
//!
//! let mut governor = ThermalGovernor::new(config, sensor, backend);
//! governor.start()?;
//! # Ok(())
//! # }
//! ```

pub use thermoguard_config as config;
pub use thermoguard_governor as governor;
pub use thermoguard_hal as hal;

/// Commonly used types
pub mod prelude {
    pub use thermoguard_config::{load_config, ConfigError, ThermalConfig};
    pub use thermoguard_governor::{
        GovernorError, ThermalGovernor, ThrottleState, ThrottleTier,
    };
    pub use thermoguard_hal::{CpufreqBackend, TemperatureSensor, FREQ_NO_LIMIT};
}

/// Workspace version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

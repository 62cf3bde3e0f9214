// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Thermoguard Hardware Abstraction
//!
//! Platform seams for the thermal governor:
//! - **Traits** (always available): [`TemperatureSensor`], [`CpufreqBackend`]
//! - **Sysfs implementation** (behind `sysfs` feature, Linux only):
//!   [`sysfs::SysfsTemperatureSensor`], [`sysfs::SysfsCpufreq`]
//! - **Mock implementations** (always available): [`mock::MockSensor`],
//!   [`mock::MockCpufreq`] for tests and simulation
//!
//! ## Usage
//!
//! ```rust
//! use thermoguard_hal::{TemperatureSensor, mock::MockSensor};
//!
//! let sensor = MockSensor::new(55);
//! assert_eq!(sensor.read_temp(0).unwrap(), 55);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod mock;
pub mod traits;

#[cfg(all(feature = "sysfs", target_os = "linux"))]
pub mod sysfs;

pub use error::{PolicyError, SensorError};
pub use traits::{CpufreqBackend, TemperatureSensor, FREQ_NO_LIMIT};

// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Hardware abstraction traits
//!
//! These traits are the seam between the governor's decision logic and the
//! platform: the same control loop runs against sysfs on Linux or against
//! in-memory mocks in tests.

use crate::error::{PolicyError, SensorError};

/// Sentinel ceiling meaning "unrestricted"
///
/// Backends translate this to whatever their platform uses to lift a limit
/// (for sysfs, the core's `cpuinfo_max_freq`).
pub const FREQ_NO_LIMIT: u32 = u32::MAX;

/// A source of temperature readings, addressed by sensor id
pub trait TemperatureSensor: Send + Sync {
    /// Read the current temperature of `sensor` in whole degrees Celsius
    fn read_temp(&self, sensor: u32) -> Result<i32, SensorError>;

    /// Backend name for logging/debugging
    fn name(&self) -> &'static str {
        "generic sensor"
    }
}

/// Per-core frequency policy control
///
/// Ceiling changes are two-step: [`set_ceiling`](Self::set_ceiling) stages
/// the new limit, [`commit_policy`](Self::commit_policy) makes the platform
/// re-evaluate the core's policy against it. Either step may fail
/// independently.
pub trait CpufreqBackend: Send + Sync {
    /// Number of possible cores, iterated as ids `0..core_count()`
    fn core_count(&self) -> usize;

    /// The core's currently enforced maximum frequency in kHz
    fn current_ceiling(&self, core: u32) -> Result<u32, PolicyError>;

    /// The core's hardware maximum frequency in kHz
    fn hardware_max(&self, core: u32) -> Result<u32, PolicyError>;

    /// Stage a new maximum frequency for the core ([`FREQ_NO_LIMIT`] lifts the cap)
    fn set_ceiling(&self, core: u32, khz: u32) -> Result<(), PolicyError>;

    /// Re-evaluate the core's policy against the staged ceiling
    fn commit_policy(&self, core: u32) -> Result<(), PolicyError>;

    /// Backend name for logging/debugging
    fn name(&self) -> &'static str {
        "generic cpufreq"
    }
}

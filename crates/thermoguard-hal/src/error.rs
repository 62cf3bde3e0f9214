// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for hardware operations

use thiserror::Error;

/// Temperature sensor errors
///
/// A sensor read failure is never fatal to the governor: the cycle in which
/// it occurs becomes a no-op and is retried at the next interval.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SensorError {
    /// The requested sensor does not exist on this platform
    #[error("temperature sensor {0} not present")]
    NotFound(u32),

    /// The sensor exists but could not be read
    #[error("unable to read temperature sensor {sensor}: {reason}")]
    ReadFailed { sensor: u32, reason: String },
}

/// Frequency policy errors
///
/// Per-core policy failures are logged by the caller and never abort the
/// cycle; the remaining cores are still processed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// No cpufreq policy handle is available for this core
    #[error("no cpufreq policy on cpu{0}")]
    NoPolicy(u32),

    /// Writing the frequency ceiling failed
    #[error("failed to set frequency ceiling on cpu{core}: {reason}")]
    SetCeiling { core: u32, reason: String },

    /// Re-evaluating the policy after a ceiling change failed
    #[error("failed to commit cpufreq policy on cpu{core}: {reason}")]
    Commit { core: u32, reason: String },
}

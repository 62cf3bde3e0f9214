// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Thermoguard Governor
//!
//! The core of thermoguard: a periodic control loop that protects a
//! multi-core processor from thermal overrun by capping each core's maximum
//! frequency from a single temperature sample per cycle.
//!
//! ## Design
//! - [`TierEngine`] is a pure decision table: three trip points with
//!   hysteresis, evaluated per core against a shared throttle tier
//! - [`PolicyApplier`] commits ceilings through the platform backend
//!   (set, then commit; either step may fail without aborting the cycle)
//! - [`ThermalGovernor`] runs the sample/decide/apply cycle in a dedicated
//!   worker thread and owns the enable/disable lifecycle: disabling cancels
//!   the pending cycle, waits for an in-flight one, and unconditionally
//!   restores every core to unrestricted
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use thermoguard_config::ThermalConfig;
//! use thermoguard_governor::ThermalGovernor;
//! use thermoguard_hal::mock::{MockCpufreq, MockSensor};
//!
//! let config = ThermalConfig::default();
//! let sensor = Arc::new(MockSensor::new(55));
//! let backend = Arc::new(MockCpufreq::new(2, 1_512_000));
//! let mut governor = ThermalGovernor::new(config, sensor, backend);
//! governor.start().unwrap();
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod applier;
pub mod params;
pub mod runner;
pub mod sampler;
pub mod state;
pub mod tier;

pub use applier::PolicyApplier;
pub use params::ParamError;
pub use runner::{GovernorError, ThermalGovernor};
pub use sampler::Sampler;
pub use state::ThrottleState;
pub use tier::{TierDecision, TierEngine, TierTable, TierThreshold, ThrottleTier, Transition};

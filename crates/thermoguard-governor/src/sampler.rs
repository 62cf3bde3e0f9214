// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Temperature sampling
//!
//! Binds the configured sensor id to a sensor backend. A failed read mutates
//! nothing; the caller skips the cycle and retries at the next interval.

use std::sync::Arc;
use thermoguard_hal::{SensorError, TemperatureSensor};

/// One-sensor sampler used once per polling cycle
pub struct Sampler {
    sensor: Arc<dyn TemperatureSensor>,
    sensor_id: u32,
}

impl Sampler {
    pub fn new(sensor: Arc<dyn TemperatureSensor>, sensor_id: u32) -> Self {
        Self { sensor, sensor_id }
    }

    /// Read the current temperature in whole degrees Celsius
    pub fn read(&self) -> Result<i32, SensorError> {
        self.sensor.read_temp(self.sensor_id)
    }

    pub fn sensor_id(&self) -> u32 {
        self.sensor_id
    }
}

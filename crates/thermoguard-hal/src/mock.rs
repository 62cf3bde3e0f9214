// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! In-memory sensor and cpufreq implementations
//!
//! Used by the governor's test suites and by simulation runs. Both mocks
//! support failure injection so error paths can be exercised
//! deterministically.

use crate::error::{PolicyError, SensorError};
use crate::traits::{CpufreqBackend, TemperatureSensor};
use parking_lot::Mutex;
use std::collections::HashSet;

/// A settable temperature source
pub struct MockSensor {
    temp: Mutex<i32>,
    failing: Mutex<bool>,
}

impl MockSensor {
    pub fn new(temp: i32) -> Self {
        Self {
            temp: Mutex::new(temp),
            failing: Mutex::new(false),
        }
    }

    /// Set the temperature returned by subsequent reads
    pub fn set_temp(&self, temp: i32) {
        *self.temp.lock() = temp;
    }

    /// Make subsequent reads fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }
}

impl TemperatureSensor for MockSensor {
    fn read_temp(&self, sensor: u32) -> Result<i32, SensorError> {
        if *self.failing.lock() {
            return Err(SensorError::ReadFailed {
                sensor,
                reason: "injected failure".to_string(),
            });
        }
        Ok(*self.temp.lock())
    }

    fn name(&self) -> &'static str {
        "mock sensor"
    }
}

/// An in-memory multi-core frequency policy
///
/// Stores the raw ceiling written per core (including [`crate::FREQ_NO_LIMIT`])
/// and records every committed core so tests can assert the set-then-commit
/// order was respected.
pub struct MockCpufreq {
    hw_max_khz: u32,
    ceilings: Mutex<Vec<u32>>,
    commits: Mutex<Vec<u32>>,
    absent: Mutex<HashSet<u32>>,
    fail_set: Mutex<bool>,
    fail_commit: Mutex<bool>,
}

impl MockCpufreq {
    /// Create `cores` cores, each starting at its hardware maximum
    pub fn new(cores: usize, hw_max_khz: u32) -> Self {
        Self {
            hw_max_khz,
            ceilings: Mutex::new(vec![hw_max_khz; cores]),
            commits: Mutex::new(Vec::new()),
            absent: Mutex::new(HashSet::new()),
            fail_set: Mutex::new(false),
            fail_commit: Mutex::new(false),
        }
    }

    /// The raw ceiling last written for `core`
    pub fn ceiling(&self, core: u32) -> u32 {
        self.ceilings.lock()[core as usize]
    }

    /// Cores committed so far, in order
    pub fn committed(&self) -> Vec<u32> {
        self.commits.lock().clone()
    }

    /// Pretend `core` has no policy handle (reads fail with `NoPolicy`)
    pub fn set_absent(&self, core: u32, absent: bool) {
        if absent {
            self.absent.lock().insert(core);
        } else {
            self.absent.lock().remove(&core);
        }
    }

    /// Make ceiling writes fail
    pub fn fail_set_ceiling(&self, failing: bool) {
        *self.fail_set.lock() = failing;
    }

    /// Make policy commits fail
    pub fn fail_commit(&self, failing: bool) {
        *self.fail_commit.lock() = failing;
    }

    fn check_core(&self, core: u32) -> Result<(), PolicyError> {
        if self.absent.lock().contains(&core) || core as usize >= self.ceilings.lock().len() {
            return Err(PolicyError::NoPolicy(core));
        }
        Ok(())
    }
}

impl CpufreqBackend for MockCpufreq {
    fn core_count(&self) -> usize {
        self.ceilings.lock().len()
    }

    fn current_ceiling(&self, core: u32) -> Result<u32, PolicyError> {
        self.check_core(core)?;
        Ok(self.ceilings.lock()[core as usize])
    }

    fn hardware_max(&self, core: u32) -> Result<u32, PolicyError> {
        self.check_core(core)?;
        Ok(self.hw_max_khz)
    }

    fn set_ceiling(&self, core: u32, khz: u32) -> Result<(), PolicyError> {
        self.check_core(core)?;
        if *self.fail_set.lock() {
            return Err(PolicyError::SetCeiling {
                core,
                reason: "injected failure".to_string(),
            });
        }
        self.ceilings.lock()[core as usize] = khz;
        Ok(())
    }

    fn commit_policy(&self, core: u32) -> Result<(), PolicyError> {
        self.check_core(core)?;
        if *self.fail_commit.lock() {
            return Err(PolicyError::Commit {
                core,
                reason: "injected failure".to_string(),
            });
        }
        self.commits.lock().push(core);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock cpufreq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FREQ_NO_LIMIT;

    #[test]
    fn test_sensor_failure_injection() {
        let sensor = MockSensor::new(42);
        assert_eq!(sensor.read_temp(0).unwrap(), 42);

        sensor.set_failing(true);
        assert!(sensor.read_temp(0).is_err());

        sensor.set_failing(false);
        sensor.set_temp(77);
        assert_eq!(sensor.read_temp(0).unwrap(), 77);
    }

    #[test]
    fn test_cpufreq_set_and_commit() {
        let backend = MockCpufreq::new(2, 1_512_000);
        assert_eq!(backend.core_count(), 2);
        assert_eq!(backend.current_ceiling(0).unwrap(), 1_512_000);

        backend.set_ceiling(0, 384_000).unwrap();
        backend.commit_policy(0).unwrap();
        assert_eq!(backend.ceiling(0), 384_000);
        assert_eq!(backend.committed(), vec![0]);

        backend.set_ceiling(0, FREQ_NO_LIMIT).unwrap();
        assert_eq!(backend.ceiling(0), FREQ_NO_LIMIT);
    }

    #[test]
    fn test_absent_core_has_no_policy() {
        let backend = MockCpufreq::new(2, 1_512_000);
        backend.set_absent(0, true);
        assert_eq!(
            backend.current_ceiling(0).unwrap_err(),
            PolicyError::NoPolicy(0)
        );
        assert!(backend.current_ceiling(1).is_ok());
    }
}

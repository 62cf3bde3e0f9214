// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Linux sysfs-backed sensor and cpufreq implementations
//!
//! Temperatures come from `/sys/class/thermal/thermal_zone<N>/temp`
//! (millidegrees Celsius), ceilings are enforced through
//! `/sys/devices/system/cpu/cpu<N>/cpufreq/scaling_max_freq` (kHz). Both
//! roots are overridable so tests can run against a fake tree.

use crate::error::{PolicyError, SensorError};
use crate::traits::{CpufreqBackend, TemperatureSensor, FREQ_NO_LIMIT};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const THERMAL_ROOT: &str = "/sys/class/thermal";
const CPU_ROOT: &str = "/sys/devices/system/cpu";

fn read_trimmed(path: &Path) -> std::io::Result<String> {
    Ok(fs::read_to_string(path)?.trim().to_string())
}

/// Thermal-zone temperature sensor
pub struct SysfsTemperatureSensor {
    root: PathBuf,
}

impl SysfsTemperatureSensor {
    pub fn new() -> Self {
        Self::with_root(THERMAL_ROOT)
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn zone_temp_path(&self, sensor: u32) -> PathBuf {
        self.root.join(format!("thermal_zone{}", sensor)).join("temp")
    }
}

impl Default for SysfsTemperatureSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureSensor for SysfsTemperatureSensor {
    fn read_temp(&self, sensor: u32) -> Result<i32, SensorError> {
        let path = self.zone_temp_path(sensor);
        let raw = read_trimmed(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SensorError::NotFound(sensor),
            _ => SensorError::ReadFailed {
                sensor,
                reason: e.to_string(),
            },
        })?;

        let millidegrees: i64 = raw.parse().map_err(|_| SensorError::ReadFailed {
            sensor,
            reason: format!("unparseable reading '{}'", raw),
        })?;

        Ok((millidegrees / 1000) as i32)
    }

    fn name(&self) -> &'static str {
        "sysfs thermal zone"
    }
}

/// Cpufreq policy control through per-core `scaling_max_freq`
pub struct SysfsCpufreq {
    root: PathBuf,
}

impl SysfsCpufreq {
    pub fn new() -> Self {
        Self::with_root(CPU_ROOT)
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn policy_dir(&self, core: u32) -> PathBuf {
        self.root.join(format!("cpu{}", core)).join("cpufreq")
    }

    fn read_khz(&self, core: u32, file: &str) -> Result<u32, PolicyError> {
        let path = self.policy_dir(core).join(file);
        let raw = read_trimmed(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PolicyError::NoPolicy(core),
            _ => PolicyError::SetCeiling {
                core,
                reason: e.to_string(),
            },
        })?;
        raw.parse().map_err(|_| PolicyError::SetCeiling {
            core,
            reason: format!("unparseable frequency '{}' in {}", raw, file),
        })
    }
}

impl Default for SysfsCpufreq {
    fn default() -> Self {
        Self::new()
    }
}

impl CpufreqBackend for SysfsCpufreq {
    fn core_count(&self) -> usize {
        // "present" holds a range like "0-7" (or "0" on single core)
        let present = self.root.join("present");
        match read_trimmed(&present) {
            Ok(raw) => {
                let last = raw.rsplit('-').next().unwrap_or("0");
                last.parse::<usize>().map(|n| n + 1).unwrap_or(1)
            }
            Err(e) => {
                debug!("cannot read {}: {}", present.display(), e);
                1
            }
        }
    }

    fn current_ceiling(&self, core: u32) -> Result<u32, PolicyError> {
        self.read_khz(core, "scaling_max_freq")
    }

    fn hardware_max(&self, core: u32) -> Result<u32, PolicyError> {
        self.read_khz(core, "cpuinfo_max_freq")
    }

    fn set_ceiling(&self, core: u32, khz: u32) -> Result<(), PolicyError> {
        // lifting the cap means writing the hardware maximum back
        let effective = if khz == FREQ_NO_LIMIT {
            self.hardware_max(core)?
        } else {
            khz
        };
        let path = self.policy_dir(core).join("scaling_max_freq");
        fs::write(&path, format!("{}\n", effective)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PolicyError::NoPolicy(core),
            _ => PolicyError::SetCeiling {
                core,
                reason: e.to_string(),
            },
        })
    }

    fn commit_policy(&self, core: u32) -> Result<(), PolicyError> {
        // the kernel re-evaluates the policy on write; reading the ceiling
        // back confirms the policy accepted it
        self.read_khz(core, "scaling_max_freq")
            .map(|_| ())
            .map_err(|e| match e {
                PolicyError::NoPolicy(c) => PolicyError::NoPolicy(c),
                other => PolicyError::Commit {
                    core,
                    reason: other.to_string(),
                },
            })
    }

    fn name(&self) -> &'static str {
        "sysfs cpufreq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fake_thermal_tree(zone: u32, millidegrees: i64) -> TempDir {
        let dir = TempDir::new().unwrap();
        let zone_dir = dir.path().join(format!("thermal_zone{}", zone));
        fs::create_dir_all(&zone_dir).unwrap();
        fs::write(zone_dir.join("temp"), format!("{}\n", millidegrees)).unwrap();
        dir
    }

    fn fake_cpu_tree(cores: u32, hw_max: u32, ceiling: u32) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("present"), format!("0-{}\n", cores - 1)).unwrap();
        for core in 0..cores {
            let policy = dir.path().join(format!("cpu{}", core)).join("cpufreq");
            fs::create_dir_all(&policy).unwrap();
            fs::write(policy.join("cpuinfo_max_freq"), format!("{}\n", hw_max)).unwrap();
            fs::write(policy.join("scaling_max_freq"), format!("{}\n", ceiling)).unwrap();
        }
        dir
    }

    #[test]
    fn test_reads_millidegrees_as_degrees() {
        let tree = fake_thermal_tree(0, 76_500);
        let sensor = SysfsTemperatureSensor::with_root(tree.path());
        assert_eq!(sensor.read_temp(0).unwrap(), 76);
    }

    #[test]
    fn test_missing_zone_is_not_found() {
        let tree = fake_thermal_tree(0, 50_000);
        let sensor = SysfsTemperatureSensor::with_root(tree.path());
        assert_eq!(sensor.read_temp(5).unwrap_err(), SensorError::NotFound(5));
    }

    #[test]
    fn test_core_count_from_present_range() {
        let tree = fake_cpu_tree(4, 1_512_000, 1_512_000);
        let backend = SysfsCpufreq::with_root(tree.path());
        assert_eq!(backend.core_count(), 4);
    }

    #[test]
    fn test_set_and_commit_ceiling() {
        let tree = fake_cpu_tree(2, 1_512_000, 1_512_000);
        let backend = SysfsCpufreq::with_root(tree.path());

        backend.set_ceiling(1, 384_000).unwrap();
        backend.commit_policy(1).unwrap();
        assert_eq!(backend.current_ceiling(1).unwrap(), 384_000);
        // other core untouched
        assert_eq!(backend.current_ceiling(0).unwrap(), 1_512_000);
    }

    #[test]
    fn test_no_limit_writes_hardware_max() {
        let tree = fake_cpu_tree(1, 1_512_000, 384_000);
        let backend = SysfsCpufreq::with_root(tree.path());

        backend.set_ceiling(0, FREQ_NO_LIMIT).unwrap();
        assert_eq!(backend.current_ceiling(0).unwrap(), 1_512_000);
    }

    #[test]
    fn test_missing_core_has_no_policy() {
        let tree = fake_cpu_tree(1, 1_512_000, 1_512_000);
        let backend = SysfsCpufreq::with_root(tree.path());
        assert!(matches!(
            backend.current_ceiling(3).unwrap_err(),
            PolicyError::NoPolicy(3)
        ));
    }
}

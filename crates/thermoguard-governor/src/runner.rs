// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Periodic control loop and lifecycle
//!
//! Runs the sample/decide/apply cycle in a dedicated worker thread: the first
//! cycle executes immediately on start, then once per configured interval.
//! Exactly one cycle runs at a time; the shared throttle state is never
//! touched by two concurrent cycles.
//!
//! Disabling cancels the pending cycle, waits for an in-flight one to finish
//! naturally, and then unconditionally restores every core to unrestricted.
//! Enabling only sets the flag; it does not re-arm the loop.

use crate::applier::PolicyApplier;
use crate::params::ParamError;
use crate::sampler::Sampler;
use crate::state::ThrottleState;
use crate::tier::{TierEngine, TierTable, Transition};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thermoguard_config::ThermalConfig;
use thermoguard_hal::{CpufreqBackend, TemperatureSensor, FREQ_NO_LIMIT};
use tracing::{debug, error, info, warn};

/// Iteration index of the core that commits shared-tier downgrades
const GATE_CORE_INDEX: u32 = 1;

/// Sleep chunk size; bounds how long shutdown waits on a sleeping worker
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

/// Governor lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum GovernorError {
    #[error("thermal governor already running")]
    AlreadyRunning,

    #[error("failed to spawn polling thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Everything one polling cycle needs, shared with the worker thread
struct CycleContext {
    sampler: Sampler,
    engine: TierEngine,
    applier: PolicyApplier,
    backend: Arc<dyn CpufreqBackend>,
    state: Mutex<ThrottleState>,
}

impl CycleContext {
    /// One cycle: sample once, evaluate and apply per core
    fn run_cycle(&self) {
        let temp = match self.sampler.read() {
            Ok(t) => t,
            Err(e) => {
                // fail open: skip protection for this cycle, retry next interval
                error!("unable to read temperature sensor {}: {}", self.sampler.sensor_id(), e);
                return;
            }
        };

        let cores = self.backend.core_count() as u32;
        for core in 0..cores {
            let ceiling = match self.backend.current_ceiling(core) {
                Ok(c) => c,
                Err(e) => {
                    debug!("no cpufreq policy on cpu{}: {}", core, e);
                    continue;
                }
            };
            let hw_max = match self.backend.hardware_max(core) {
                Ok(m) => m,
                Err(e) => {
                    debug!("no cpufreq policy on cpu{}: {}", core, e);
                    continue;
                }
            };

            let gate_core = core == GATE_CORE_INDEX;
            let mut state = self.state.lock();
            let decision = self.engine.evaluate(
                temp,
                state.tier,
                ceiling,
                hw_max,
                state.pre_throttle_khz,
                gate_core,
            );

            match decision.transition {
                Some(Transition::Trip(tier)) => {
                    warn!("thermal throttled ({})! temp: {}", tier.label(), temp);
                }
                Some(Transition::Clear(tier)) => {
                    if tier == crate::tier::ThrottleTier::Low && state.pre_throttle_khz == 0 {
                        warn!(
                            "pre-throttle ceiling unknown for cpu{}, falling back to {} kHz",
                            core, decision.target_khz
                        );
                    }
                    warn!("{} thermal throttling ended! temp: {}", tier.label(), temp);
                }
                None => {}
            }

            if let Some(captured) = decision.captured_pre_throttle {
                state.pre_throttle_khz = captured;
            }

            if decision.update {
                // per-core failures never abort the cycle
                if let Err(e) = self.applier.apply(&mut state, core, decision.target_khz) {
                    debug!("cpu{}: ceiling update failed: {}", core, e);
                }
            }

            state.tier = decision.tier;
        }
    }
}

/// The thermal governor: periodic worker plus enable/disable lifecycle
pub struct ThermalGovernor {
    ctx: Arc<CycleContext>,
    config: ThermalConfig,
    interval: Duration,
    enabled: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl ThermalGovernor {
    /// Build a governor from a validated configuration and platform backends
    pub fn new(
        config: ThermalConfig,
        sensor: Arc<dyn TemperatureSensor>,
        backend: Arc<dyn CpufreqBackend>,
    ) -> Self {
        let ctx = CycleContext {
            sampler: Sampler::new(sensor, config.sensor_id),
            engine: TierEngine::new(TierTable::from_config(&config)),
            applier: PolicyApplier::new(backend.clone()),
            backend,
            state: Mutex::new(ThrottleState::new()),
        };
        let interval = Duration::from_millis(config.check_interval_ms);
        let enabled = config.enabled;
        Self {
            ctx: Arc::new(ctx),
            config,
            interval,
            enabled: Arc::new(AtomicBool::new(enabled)),
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Arm the polling loop: the first cycle runs immediately
    pub fn start(&mut self) -> Result<(), GovernorError> {
        if self.running.load(Ordering::Acquire) {
            return Err(GovernorError::AlreadyRunning);
        }

        info!(
            "arming thermal polling on sensor {} every {} ms",
            self.config.sensor_id, self.config.check_interval_ms
        );
        self.enabled.store(true, Ordering::Release);
        self.running.store(true, Ordering::Release);

        let ctx = self.ctx.clone();
        let interval = self.interval;
        let running = self.running.clone();
        let enabled = self.enabled.clone();

        let spawned = thread::Builder::new()
            .name("thermoguard-poll".to_string())
            .spawn(move || {
                while running.load(Ordering::Acquire) {
                    ctx.run_cycle();

                    // reschedule only while enabled and not cancelled
                    if !enabled.load(Ordering::Acquire) || !running.load(Ordering::Acquire) {
                        break;
                    }

                    let target = Instant::now() + interval;
                    while running.load(Ordering::Relaxed) {
                        let now = Instant::now();
                        if now >= target {
                            break;
                        }
                        thread::sleep((target - now).min(SHUTDOWN_POLL));
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                self.thread_handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                Err(GovernorError::Spawn(e))
            }
        }
    }

    /// Cancel the pending cycle and wait for an in-flight one to finish
    pub fn stop(&mut self) {
        if !self.running.load(Ordering::Acquire) {
            return;
        }

        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                error!("polling thread panicked during shutdown");
            }
        }
    }

    /// Whether the polling loop is armed
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Whether throttling enforcement is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Run one sampling cycle synchronously
    ///
    /// The worker thread uses this; it is public so callers can drive cycles
    /// deterministically (simulation, tests).
    pub fn run_cycle(&self) {
        self.ctx.run_cycle();
    }

    /// Snapshot of the shared throttle state
    pub fn throttle_state(&self) -> ThrottleState {
        *self.ctx.state.lock()
    }

    /// Enable or disable throttling enforcement
    ///
    /// Disabling tears down: the pending cycle is cancelled, an in-flight one
    /// is waited for, and every core is restored to unrestricted if any
    /// restriction was applied. Enabling only sets the flag; the loop is not
    /// re-armed.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enabled.store(true, Ordering::Release);
            info!("no action for enabled = true");
        } else {
            self.enabled.store(false, Ordering::Release);
            self.stop();
            self.release_all_cores();
        }
        info!("enabled = {}", enabled);
    }

    /// Restore every core to unrestricted, independent of the recorded tier
    fn release_all_cores(&self) {
        let mut state = self.ctx.state.lock();
        if !state.is_restricted() {
            return;
        }

        for core in 0..self.ctx.backend.core_count() as u32 {
            if let Err(e) = self.ctx.applier.apply(&mut state, core, FREQ_NO_LIMIT) {
                debug!("cpu{}: ceiling reset failed: {}", core, e);
            }
        }
    }

    /// Read a recognized tunable, see [`crate::params`]
    pub fn get_param(&self, name: &str) -> Result<String, ParamError> {
        crate::params::get(self, name)
    }

    /// Write a recognized tunable, see [`crate::params`]
    pub fn set_param(&mut self, name: &str, value: &str) -> Result<(), ParamError> {
        crate::params::set(self, name, value)
    }

    pub(crate) fn config(&self) -> &ThermalConfig {
        &self.config
    }
}

impl Drop for ThermalGovernor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermoguard_hal::mock::{MockCpufreq, MockSensor};

    fn fast_config() -> ThermalConfig {
        let mut config = ThermalConfig::default();
        config.check_interval_ms = 10;
        config
    }

    #[test]
    fn test_governor_lifecycle() {
        let sensor = Arc::new(MockSensor::new(60));
        let backend = Arc::new(MockCpufreq::new(2, 1_512_000));
        let mut governor = ThermalGovernor::new(fast_config(), sensor, backend);

        assert!(!governor.is_running());

        governor.start().unwrap();
        assert!(governor.is_running());

        thread::sleep(Duration::from_millis(50));

        governor.stop();
        assert!(!governor.is_running());
    }

    #[test]
    fn test_double_start_rejected() {
        let sensor = Arc::new(MockSensor::new(60));
        let backend = Arc::new(MockCpufreq::new(2, 1_512_000));
        let mut governor = ThermalGovernor::new(fast_config(), sensor, backend);

        governor.start().unwrap();
        assert!(matches!(
            governor.start(),
            Err(GovernorError::AlreadyRunning)
        ));
        governor.stop();
    }

    #[test]
    fn test_first_cycle_is_immediate() {
        let sensor = Arc::new(MockSensor::new(78));
        let backend = Arc::new(MockCpufreq::new(2, 1_512_000));
        let mut config = ThermalConfig::default();
        config.check_interval_ms = 60_000; // only the immediate cycle can act
        let mut governor = ThermalGovernor::new(config, sensor, backend.clone());

        governor.start().unwrap();
        thread::sleep(Duration::from_millis(100));
        governor.stop();

        assert_eq!(backend.ceiling(0), 384_000);
        assert_eq!(backend.ceiling(1), 384_000);
    }

    #[test]
    fn test_stop_on_drop() {
        let sensor = Arc::new(MockSensor::new(60));
        let backend = Arc::new(MockCpufreq::new(2, 1_512_000));
        let running;
        {
            let mut governor = ThermalGovernor::new(fast_config(), sensor, backend);
            governor.start().unwrap();
            running = governor.running.clone();
            assert!(running.load(Ordering::Acquire));
        }
        assert!(!running.load(Ordering::Acquire));
    }
}

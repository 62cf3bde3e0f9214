// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Ceiling application
//!
//! Commits one core's frequency ceiling through the backend: stage the limit,
//! then commit the policy, in that order. Only a fully successful apply
//! updates the cached applied ceiling and emits the success log line.

use crate::state::ThrottleState;
use std::sync::Arc;
use thermoguard_hal::{CpufreqBackend, PolicyError, FREQ_NO_LIMIT};
use tracing::info;

/// Applies frequency ceilings per core and maintains the cached applied value
pub struct PolicyApplier {
    backend: Arc<dyn CpufreqBackend>,
}

impl PolicyApplier {
    pub fn new(backend: Arc<dyn CpufreqBackend>) -> Self {
        Self { backend }
    }

    /// Apply `khz` as the maximum frequency for `core`
    ///
    /// On any failure the cached applied ceiling is left untouched and no
    /// success line is logged. Callers treat failures as non-fatal to the
    /// cycle.
    pub fn apply(
        &self,
        state: &mut ThrottleState,
        core: u32,
        khz: u32,
    ) -> Result<(), PolicyError> {
        self.backend.set_ceiling(core, khz)?;
        self.backend.commit_policy(core)?;

        state.applied_khz = khz;
        if khz != FREQ_NO_LIMIT {
            info!("limiting cpu{} max frequency to {} kHz", core, khz);
        } else {
            info!("max frequency reset for cpu{}", core);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermoguard_hal::mock::MockCpufreq;

    #[test]
    fn test_success_updates_cached_ceiling() {
        let backend = Arc::new(MockCpufreq::new(2, 1_512_000));
        let applier = PolicyApplier::new(backend.clone());
        let mut state = ThrottleState::new();

        applier.apply(&mut state, 1, 384_000).unwrap();
        assert_eq!(state.applied_khz, 384_000);
        assert_eq!(backend.ceiling(1), 384_000);
        assert_eq!(backend.committed(), vec![1]);
    }

    #[test]
    fn test_set_failure_leaves_cache_untouched() {
        let backend = Arc::new(MockCpufreq::new(1, 1_512_000));
        backend.fail_set_ceiling(true);
        let applier = PolicyApplier::new(backend.clone());
        let mut state = ThrottleState::new();

        assert!(applier.apply(&mut state, 0, 384_000).is_err());
        assert_eq!(state.applied_khz, FREQ_NO_LIMIT);
        // commit must not run after a failed set
        assert!(backend.committed().is_empty());
    }

    #[test]
    fn test_commit_failure_leaves_cache_untouched() {
        let backend = Arc::new(MockCpufreq::new(1, 1_512_000));
        backend.fail_commit(true);
        let applier = PolicyApplier::new(backend.clone());
        let mut state = ThrottleState::new();

        assert!(applier.apply(&mut state, 0, 384_000).is_err());
        assert_eq!(state.applied_khz, FREQ_NO_LIMIT);
    }
}

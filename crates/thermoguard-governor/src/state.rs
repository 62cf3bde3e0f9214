// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared throttle state
//!
//! One instance exists per governor, shared by every core's evaluation and by
//! the disable path. The applied ceiling is deliberately a single scalar
//! rather than per-core: it reflects the most recent committed decision for
//! any core.

use crate::tier::ThrottleTier;
use thermoguard_hal::FREQ_NO_LIMIT;

/// Process-wide throttling state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleState {
    /// Current shared throttle tier
    pub tier: ThrottleTier,
    /// Ceiling captured when entering the low tier; 0 = never captured
    pub pre_throttle_khz: u32,
    /// Last ceiling successfully applied to any core
    pub applied_khz: u32,
}

impl ThrottleState {
    pub fn new() -> Self {
        Self {
            tier: ThrottleTier::None,
            pre_throttle_khz: 0,
            applied_khz: FREQ_NO_LIMIT,
        }
    }

    /// Whether any restriction was ever successfully applied and not lifted
    pub fn is_restricted(&self) -> bool {
        self.applied_khz != FREQ_NO_LIMIT
    }
}

impl Default for ThrottleState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_unrestricted() {
        let state = ThrottleState::new();
        assert_eq!(state.tier, ThrottleTier::None);
        assert_eq!(state.pre_throttle_khz, 0);
        assert!(!state.is_restricted());
    }
}

// Copyright 2025 Thermoguard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tier decision engine
//!
//! A pure, priority-ordered branch table mapping one temperature sample and a
//! core's current ceiling to a throttling decision. Three tiers with
//! hysteresis: each trips at `trip_high` and clears below
//! `trip_high - hysteresis_band`, so a reading oscillating inside the band
//! never toggles the tier.
//!
//! Trips are evaluated before clears, and clears most-restrictive-first, so
//! downgrades step down one tier per cycle no matter how far the temperature
//! fell. Only the low tier fully restores the pre-throttle ceiling.

use thermoguard_config::ThermalConfig;

/// Throttle tier, ordered by restrictiveness
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ThrottleTier {
    None = 0,
    Low = 1,
    Mid = 2,
    Max = 3,
}

impl ThrottleTier {
    /// Lowercase label for log lines
    pub fn label(&self) -> &'static str {
        match self {
            ThrottleTier::None => "none",
            ThrottleTier::Low => "low",
            ThrottleTier::Mid => "mid",
            ThrottleTier::Max => "max",
        }
    }
}

/// One tier's trip point, clear point, and frequency cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThreshold {
    /// Temperature at or above which the tier activates (°C)
    pub trip_high: i32,
    /// Temperature below which the tier may deactivate (°C)
    pub trip_low: i32,
    /// Ceiling enforced while the tier is active (kHz)
    pub cap_khz: u32,
}

/// The complete three-tier threshold table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable {
    pub low: TierThreshold,
    pub mid: TierThreshold,
    pub max: TierThreshold,
    /// Restore target when no pre-throttle ceiling was captured (kHz)
    pub fallback_khz: u32,
}

impl TierTable {
    /// Build the table from a validated configuration
    pub fn from_config(config: &ThermalConfig) -> Self {
        let threshold = |tier: &thermoguard_config::TierConfig| TierThreshold {
            trip_high: tier.trip_high,
            trip_low: config.trip_low(tier),
            cap_khz: tier.freq_khz,
        };
        Self {
            low: threshold(&config.low),
            mid: threshold(&config.mid),
            max: threshold(&config.max),
            fallback_khz: config.fallback_khz,
        }
    }
}

/// A tier trip or clear, carried on decisions for transition logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The named tier activated
    Trip(ThrottleTier),
    /// The named tier deactivated
    Clear(ThrottleTier),
}

/// The outcome of evaluating one core in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDecision {
    /// Tier to record after this core is processed
    pub tier: ThrottleTier,
    /// Ceiling to apply when `update` is set (kHz)
    pub target_khz: u32,
    /// Whether the core's ceiling should be (re)applied
    pub update: bool,
    /// Ceiling to record as the pre-throttle value, captured on a low trip
    pub captured_pre_throttle: Option<u32>,
    /// Tier transition this decision represents, if any
    pub transition: Option<Transition>,
}

/// Pure decision function over the tier table
pub struct TierEngine {
    table: TierTable,
}

impl TierEngine {
    pub fn new(table: TierTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TierTable {
        &self.table
    }

    /// Evaluate one core against the current sample
    ///
    /// `gate_core` marks the designated core whose processing commits a
    /// shared-tier downgrade: clear branches relax every core's ceiling, but
    /// the recorded tier only steps down once the gate core has been relaxed,
    /// so the tier never reports a laxer state than some core still enforces.
    ///
    /// Branches are mutually exclusive, first match wins.
    pub fn evaluate(
        &self,
        temp: i32,
        current_tier: ThrottleTier,
        core_ceiling_khz: u32,
        hw_max_khz: u32,
        pre_throttle_khz: u32,
        gate_core: bool,
    ) -> TierDecision {
        let t = &self.table;
        let mut decision = TierDecision {
            tier: current_tier,
            target_khz: core_ceiling_khz,
            update: false,
            captured_pre_throttle: None,
            transition: None,
        };

        if temp >= t.low.trip_high && temp < t.mid.trip_high && core_ceiling_khz > t.low.cap_khz {
            // low trip: remember the unrestricted ceiling before capping
            decision.captured_pre_throttle = Some(core_ceiling_khz);
            decision.target_khz = t.low.cap_khz;
            decision.tier = ThrottleTier::Low;
            decision.update = true;
            decision.transition = Some(Transition::Trip(ThrottleTier::Low));
        } else if temp >= t.low.trip_high
            && temp < t.mid.trip_low
            && core_ceiling_khz > t.mid.cap_khz
        {
            // mid trip targets the low cap, not the mid cap
            decision.target_khz = t.low.cap_khz;
            decision.tier = ThrottleTier::Mid;
            decision.update = true;
            decision.transition = Some(Transition::Trip(ThrottleTier::Mid));
        } else if temp >= t.max.trip_high && core_ceiling_khz > t.max.cap_khz {
            decision.target_khz = t.max.cap_khz;
            decision.tier = ThrottleTier::Max;
            decision.update = true;
            decision.transition = Some(Transition::Trip(ThrottleTier::Max));
        } else if temp < t.max.trip_low
            && current_tier >= ThrottleTier::Max
            && core_ceiling_khz < hw_max_khz
        {
            // single-step down, never a full release from max
            decision.target_khz = t.mid.cap_khz;
            if gate_core {
                decision.tier = ThrottleTier::Mid;
            }
            decision.update = true;
            decision.transition = Some(Transition::Clear(ThrottleTier::Max));
        } else if temp < t.mid.trip_low
            && current_tier >= ThrottleTier::Mid
            && core_ceiling_khz < hw_max_khz
        {
            decision.target_khz = t.low.cap_khz;
            if gate_core {
                decision.tier = ThrottleTier::Low;
            }
            decision.update = true;
            decision.transition = Some(Transition::Clear(ThrottleTier::Mid));
        } else if temp < t.low.trip_low
            && current_tier >= ThrottleTier::Low
            && core_ceiling_khz < hw_max_khz
        {
            // full restore: the captured ceiling, or the fixed fallback if
            // none was ever captured
            decision.target_khz = if pre_throttle_khz != 0 {
                pre_throttle_khz
            } else {
                t.fallback_khz
            };
            if gate_core {
                decision.tier = ThrottleTier::None;
            }
            decision.update = true;
            decision.transition = Some(Transition::Clear(ThrottleTier::Low));
        }

        decision
    }
}

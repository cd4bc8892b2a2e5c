//! Fixed steering thresholds.

use crate::error::{SteeringError, SteeringResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Detection thresholds and output bounds for the steering module.
///
/// Thresholds are fixed for the lifetime of a controller: they are validated
/// once when the controller is built and cannot be changed afterwards.
/// Defaults match the Kia Soul steering column calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SteeringThresholds {
    /// Torque magnitude on either sensor channel that counts as the operator
    /// taking the wheel.
    pub override_threshold: u32,
    /// Consecutive invalid sensor reads before the sensor fault latches.
    pub invalid_read_limit: u32,
    /// Lowest spoof value the actuation output may be driven to.
    pub spoof_min: u16,
    /// Highest spoof value the actuation output may be driven to.
    pub spoof_max: u16,
    /// Number of sensor samples taken while ramping across a relay transition.
    pub guard_samples: u16,
    /// Raw reading that marks a disconnected sensor channel.
    pub disconnected_sentinel: i32,
    /// Left shift applied to sensor counts to express them in output units
    /// (10-bit ADC into a 12-bit DAC).
    pub baseline_shift: u32,
}

impl Default for SteeringThresholds {
    fn default() -> Self {
        Self {
            override_threshold: 750,
            invalid_read_limit: 4,
            spoof_min: 868,
            spoof_max: 3031,
            guard_samples: 20,
            disconnected_sentinel: -1,
            baseline_shift: 2,
        }
    }
}

impl SteeringThresholds {
    /// Largest shift that keeps a 16-bit sensor reading inside `i64` math.
    pub const MAX_BASELINE_SHIFT: u32 = 16;

    /// Validate thresholds are within safe operating ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SteeringError::InvalidThreshold`] naming the first offending field.
    pub fn validate(&self) -> SteeringResult {
        if self.override_threshold == 0 {
            return Err(SteeringError::invalid_threshold(
                "override_threshold",
                "must be greater than 0",
            ));
        }
        if self.invalid_read_limit == 0 {
            return Err(SteeringError::invalid_threshold(
                "invalid_read_limit",
                "must be greater than 0",
            ));
        }
        if self.spoof_min > self.spoof_max {
            return Err(SteeringError::invalid_threshold(
                "spoof_min",
                "must not exceed spoof_max",
            ));
        }
        if self.guard_samples == 0 {
            return Err(SteeringError::invalid_threshold(
                "guard_samples",
                "must be greater than 0",
            ));
        }
        if self.baseline_shift > Self::MAX_BASELINE_SHIFT {
            return Err(SteeringError::invalid_threshold(
                "baseline_shift",
                "must be at most 16",
            ));
        }
        Ok(())
    }

    /// Clamp a spoof command into `[spoof_min, spoof_max]`.
    #[must_use]
    pub fn clamp_spoof(&self, value: u16) -> u16 {
        value.max(self.spoof_min).min(self.spoof_max)
    }
}

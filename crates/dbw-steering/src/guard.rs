//! Signal discontinuity guard for relay transitions.
//!
//! Closing or opening the spoof relay swaps the signal the steering column
//! sees between the real torque sensor and the spoof output. If the two differ
//! at that instant the column sees a torque step. The guard walks the spoof
//! output onto the live sensor baseline in bounded steps before the relay
//! changes state.

use crate::config::SteeringThresholds;
use crate::error::SteeringResult;
use crate::ports::{ActuationOutput, ActuationOutputPort, TorqueSensorPort};

/// Outcome of one guard ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampSummary {
    /// Number of outputs written.
    pub steps: u16,
    /// Output the ramp started from.
    pub start: ActuationOutput,
    /// Sensor-derived baseline at completion, equal to the last output written.
    pub baseline: ActuationOutput,
    /// Largest single-step change on either channel.
    pub max_step: u16,
}

impl RampSummary {
    /// Total change on the channel that moved furthest.
    #[must_use]
    pub fn total_delta(&self) -> u16 {
        self.start.max_delta(&self.baseline)
    }
}

/// Bounded-step ramp onto the sensor baseline.
///
/// The guard first reads the sensor `samples` times and averages the valid
/// readings into a baseline. Readings equal to the disconnected sentinel, and
/// failed reads, are left out. It then writes `samples` outputs
/// `start + (baseline - start) * step / samples`, the last of which is the
/// baseline exactly. Because the target is fixed before the first write, no
/// step moves either channel by more than `ceil(total_delta / samples)`
/// whatever the sensor does during sampling.
///
/// # Timing
///
/// The ramp runs synchronously and blocks for `samples` sensor reads and
/// `samples` output writes. Callers must budget for that latency on every
/// enable and disable.
///
/// # Example
///
/// ```rust
/// use dbw_steering::prelude::*;
///
/// let mut hw = SimulatedSteering::new(TorqueSample::new(500, 510));
/// let guard = SignalDiscontinuityGuard::new(&SteeringThresholds::default());
///
/// let ramp = guard.run(&mut hw, Some(ActuationOutput::new(1000, 1000)))?;
/// assert_eq!(ramp.steps, 20);
/// assert_eq!(ramp.baseline, ActuationOutput::new(2000, 2040));
/// assert!(ramp.max_step <= ramp.total_delta().div_ceil(20));
/// # Ok::<(), SteeringError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SignalDiscontinuityGuard {
    samples: u16,
    sentinel: i32,
    baseline_shift: u32,
}

impl SignalDiscontinuityGuard {
    /// Create a guard from validated thresholds.
    #[must_use]
    pub fn new(thresholds: &SteeringThresholds) -> Self {
        Self {
            samples: thresholds.guard_samples.max(1),
            sentinel: thresholds.disconnected_sentinel,
            baseline_shift: thresholds
                .baseline_shift
                .min(SteeringThresholds::MAX_BASELINE_SHIFT),
        }
    }

    /// Number of samples (and output steps) per ramp.
    #[must_use]
    pub fn samples(&self) -> u16 {
        self.samples
    }

    /// Ramp the output from `start` onto the live sensor baseline.
    ///
    /// With no known `start` the ramp begins at the baseline. With no valid
    /// sample the baseline is `start` and the output holds. With neither,
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns the port error if the output device rejects a write. Sensor
    /// failures do not abort the ramp.
    pub fn run<P>(&self, ports: &mut P, start: Option<ActuationOutput>) -> SteeringResult<RampSummary>
    where
        P: TorqueSensorPort + ActuationOutputPort + ?Sized,
    {
        let baseline = self.sample_baseline(ports).or(start);
        let (Some(target), Some(from)) = (baseline, start.or(baseline)) else {
            tracing::debug!("Guard skipped, no output and no valid torque sample");
            return Ok(RampSummary {
                steps: 0,
                start: ActuationOutput::default(),
                baseline: ActuationOutput::default(),
                max_step: 0,
            });
        };

        let mut previous = from;
        let mut max_step = 0u16;
        for step in 1..=self.samples {
            let output = if step == self.samples {
                target
            } else {
                ActuationOutput::new(
                    interpolate(from.high, target.high, step, self.samples),
                    interpolate(from.low, target.low, step, self.samples),
                )
            };

            ports.write_actuation(output)?;

            max_step = max_step.max(output.max_delta(&previous));
            previous = output;
        }

        Ok(RampSummary {
            steps: self.samples,
            start: from,
            baseline: target,
            max_step,
        })
    }

    fn sample_baseline<P>(&self, ports: &mut P) -> Option<ActuationOutput>
    where
        P: TorqueSensorPort + ?Sized,
    {
        let mut mean = SampleMean::default();
        for sample in 1..=self.samples {
            match ports.read_torque() {
                Ok(reading) if reading.is_valid(self.sentinel) => {
                    mean.push(reading.high, reading.low);
                }
                Ok(_) => tracing::trace!(sample, "Guard skipped disconnected torque sample"),
                Err(err) => {
                    tracing::trace!(sample, error = %err, "Guard skipped failed torque read");
                }
            }
        }
        mean.value().map(|(high, low)| self.to_output(high, low))
    }

    fn to_output(&self, high: i64, low: i64) -> ActuationOutput {
        ActuationOutput::new(
            saturate_u16(high << self.baseline_shift),
            saturate_u16(low << self.baseline_shift),
        )
    }
}

/// Running mean of the valid dual-channel samples seen so far.
#[derive(Debug, Default)]
struct SampleMean {
    sum_high: i64,
    sum_low: i64,
    count: i64,
}

impl SampleMean {
    fn push(&mut self, high: i32, low: i32) {
        self.sum_high = self.sum_high.saturating_add(i64::from(high));
        self.sum_low = self.sum_low.saturating_add(i64::from(low));
        self.count = self.count.saturating_add(1);
    }

    fn value(&self) -> Option<(i64, i64)> {
        if self.count == 0 {
            return None;
        }
        Some((
            self.sum_high.checked_div(self.count)?,
            self.sum_low.checked_div(self.count)?,
        ))
    }
}

fn interpolate(from: u16, to: u16, step: u16, steps: u16) -> u16 {
    let from = i64::from(from);
    let delta = i64::from(to).saturating_sub(from);
    let progressed = delta
        .saturating_mul(i64::from(step))
        .checked_div(i64::from(steps))
        .unwrap_or(delta);
    saturate_u16(from.saturating_add(progressed))
}

fn saturate_u16(value: i64) -> u16 {
    u16::try_from(value).unwrap_or(if value < 0 { 0 } else { u16::MAX })
}

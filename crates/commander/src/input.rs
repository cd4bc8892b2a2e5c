//! Operator input sources.

use crate::error::CommanderError;
use std::f64::consts::TAU;

/// One sample of operator intent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteeringIntent {
    pub enable_requested: bool,
    pub disable_requested: bool,
    /// Normalized steering position in `[-1, 1]`, positive to the left.
    pub steering: f64,
}

/// Something the commander can poll for operator intent.
pub trait InputSource {
    /// Read the current intent.
    ///
    /// # Errors
    ///
    /// Returns [`CommanderError::InputUnavailable`] when the device cannot be read.
    fn read_intent(&mut self) -> Result<SteeringIntent, CommanderError>;
}

/// Scripted sinusoidal steering sweep.
///
/// Requests enable on the first read, then sweeps the wheel between
/// `-amplitude` and `amplitude` once every `period` reads.
#[derive(Debug, Clone)]
pub struct SweepInput {
    amplitude: f64,
    period: u32,
    reads: u32,
}

impl SweepInput {
    /// Sweep of `amplitude` (clamped to 0..=1) repeating every `period` reads.
    pub fn new(amplitude: f64, period: u32) -> Self {
        Self {
            amplitude: amplitude.clamp(0.0, 1.0),
            period: period.max(1),
            reads: 0,
        }
    }
}

impl Default for SweepInput {
    fn default() -> Self {
        // 20 Hz polling, one full sweep every 4 s
        Self::new(0.5, 80)
    }
}

impl InputSource for SweepInput {
    fn read_intent(&mut self) -> Result<SteeringIntent, CommanderError> {
        let phase = f64::from(self.reads % self.period) / f64::from(self.period);
        let intent = SteeringIntent {
            enable_requested: self.reads == 0,
            disable_requested: false,
            steering: self.amplitude * (TAU * phase).sin(),
        };
        self.reads = self.reads.wrapping_add(1);
        Ok(intent)
    }
}

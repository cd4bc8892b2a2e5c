//! Hardware port traits consumed by the steering controller.
//!
//! The controller never touches pins or registers directly. It reads torque
//! through [`TorqueSensorPort`], drives the spoof output and relay through
//! [`ActuationOutputPort`], and emits fault reports through [`FaultReporter`].
//! Ports are owned by the integration and lent to the controller for the
//! duration of each call.

use crate::error::PortError;
use crate::report::FaultReport;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One reading of the two redundant torque sensor channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TorqueSample {
    /// High channel raw counts.
    pub high: i32,
    /// Low channel raw counts.
    pub low: i32,
}

impl TorqueSample {
    /// Create a sample from raw channel counts.
    #[must_use]
    pub const fn new(high: i32, low: i32) -> Self {
        Self { high, low }
    }

    /// A sample is valid only when neither channel reads the disconnected sentinel.
    #[must_use]
    pub fn is_valid(&self, sentinel: i32) -> bool {
        self.high != sentinel && self.low != sentinel
    }

    /// True when either channel's magnitude meets or exceeds `threshold`.
    #[must_use]
    pub fn exceeds(&self, threshold: u32) -> bool {
        self.high.unsigned_abs() >= threshold || self.low.unsigned_abs() >= threshold
    }
}

/// Spoof values written to the two actuation output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActuationOutput {
    /// Output A, paired with the high torque channel.
    pub high: u16,
    /// Output B, paired with the low torque channel.
    pub low: u16,
}

impl ActuationOutput {
    /// Create an output pair.
    #[must_use]
    pub const fn new(high: u16, low: u16) -> Self {
        Self { high, low }
    }

    /// Largest per-channel distance to another output.
    #[must_use]
    pub fn max_delta(&self, other: &ActuationOutput) -> u16 {
        self.high
            .abs_diff(other.high)
            .max(self.low.abs_diff(other.low))
    }
}

/// Dual-channel torque sensor.
pub trait TorqueSensorPort {
    /// Sample both torque channels.
    ///
    /// A disconnected channel is reported in-band through the sentinel value;
    /// an `Err` means the read itself could not complete.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::SensorUnavailable`] when the converter cannot be read.
    fn read_torque(&mut self) -> Result<TorqueSample, PortError>;
}

/// Spoof signal output device and its enable relay.
pub trait ActuationOutputPort {
    /// Drive both output channels.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::OutputRejected`] when the device refuses the write.
    fn write_actuation(&mut self, output: ActuationOutput) -> Result<(), PortError>;

    /// Close (`true`) or open (`false`) the spoof enable relay.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::RelayFault`] when the relay cannot be switched.
    fn set_relay(&mut self, enabled: bool) -> Result<(), PortError>;
}

/// Fire-and-forget fault report channel.
pub trait FaultReporter {
    /// Publish a fault report to the diagnostics bus.
    fn publish_fault_report(&mut self, report: &FaultReport);
}

/// Everything the steering controller needs from the hardware, in one borrow.
pub trait SteeringPorts: TorqueSensorPort + ActuationOutputPort + FaultReporter {}

impl<T> SteeringPorts for T where T: TorqueSensorPort + ActuationOutputPort + FaultReporter {}

//! In-memory steering hardware for tests and the host demo.
//!
//! [`SimulatedSteering`] implements every port the controller consumes and
//! records what the controller did with them.

use std::collections::VecDeque;

use crate::error::PortError;
use crate::ports::{
    ActuationOutput, ActuationOutputPort, FaultReporter, TorqueSample, TorqueSensorPort,
};
use crate::report::FaultReport;

/// Simulated torque sensor, spoof output, relay and fault report sink.
///
/// Sensor reads drain the queued samples first, then repeat the resting sample.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSteering {
    resting: TorqueSample,
    queued: VecDeque<TorqueSample>,
    failing_reads: u32,
    reads: u64,
    reject_writes: bool,
    reject_relay: bool,
    relay_closed: bool,
    relay_commands: u32,
    writes: Vec<ActuationOutput>,
    reports: Vec<FaultReport>,
}

impl SimulatedSteering {
    /// Create hardware whose sensor rests at `resting`.
    #[must_use]
    pub fn new(resting: TorqueSample) -> Self {
        Self {
            resting,
            ..Self::default()
        }
    }

    /// Change the sample returned once the queue is empty.
    pub fn set_resting(&mut self, sample: TorqueSample) {
        self.resting = sample;
    }

    /// Queue a sample to be returned by the next read.
    pub fn queue_sample(&mut self, sample: TorqueSample) {
        self.queued.push_back(sample);
    }

    /// Queue several samples in order.
    pub fn queue_samples(&mut self, samples: impl IntoIterator<Item = TorqueSample>) {
        self.queued.extend(samples);
    }

    /// Make the next `count` sensor reads fail.
    pub fn fail_next_reads(&mut self, count: u32) {
        self.failing_reads = count;
    }

    /// Reject (or accept again) output writes.
    pub fn reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    /// Reject (or accept again) relay commands.
    pub fn reject_relay(&mut self, reject: bool) {
        self.reject_relay = reject;
    }

    /// Whether the spoof relay is currently closed.
    #[must_use]
    pub fn relay_closed(&self) -> bool {
        self.relay_closed
    }

    /// Number of relay commands accepted.
    #[must_use]
    pub fn relay_commands(&self) -> u32 {
        self.relay_commands
    }

    /// Number of sensor reads served.
    #[must_use]
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Every output written, oldest first.
    #[must_use]
    pub fn writes(&self) -> &[ActuationOutput] {
        &self.writes
    }

    /// Most recent output written.
    #[must_use]
    pub fn last_write(&self) -> Option<ActuationOutput> {
        self.writes.last().copied()
    }

    /// Forget recorded writes.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Every fault report published, oldest first.
    #[must_use]
    pub fn reports(&self) -> &[FaultReport] {
        &self.reports
    }
}

impl TorqueSensorPort for SimulatedSteering {
    fn read_torque(&mut self) -> Result<TorqueSample, PortError> {
        self.reads = self.reads.saturating_add(1);
        if self.failing_reads > 0 {
            self.failing_reads = self.failing_reads.saturating_sub(1);
            return Err(PortError::sensor_unavailable("simulated read failure"));
        }
        Ok(self.queued.pop_front().unwrap_or(self.resting))
    }
}

impl ActuationOutputPort for SimulatedSteering {
    fn write_actuation(&mut self, output: ActuationOutput) -> Result<(), PortError> {
        if self.reject_writes {
            return Err(PortError::output_rejected("simulated output fault"));
        }
        self.writes.push(output);
        Ok(())
    }

    fn set_relay(&mut self, enabled: bool) -> Result<(), PortError> {
        if self.reject_relay {
            return Err(PortError::RelayFault { requested: enabled });
        }
        self.relay_closed = enabled;
        self.relay_commands = self.relay_commands.saturating_add(1);
        Ok(())
    }
}

impl FaultReporter for SimulatedSteering {
    fn publish_fault_report(&mut self, report: &FaultReport) {
        self.reports.push(*report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_before_resting() -> Result<(), PortError> {
        let mut hw = SimulatedSteering::new(TorqueSample::new(1, 2));
        hw.queue_sample(TorqueSample::new(9, 9));

        assert_eq!(hw.read_torque()?, TorqueSample::new(9, 9));
        assert_eq!(hw.read_torque()?, TorqueSample::new(1, 2));
        assert_eq!(hw.reads(), 2);
        Ok(())
    }

    #[test]
    fn test_failing_reads_expire() {
        let mut hw = SimulatedSteering::new(TorqueSample::new(1, 2));
        hw.fail_next_reads(1);
        assert!(hw.read_torque().is_err());
        assert!(hw.read_torque().is_ok());
    }

    #[test]
    fn test_relay_rejection_leaves_state() {
        let mut hw = SimulatedSteering::default();
        hw.reject_relay(true);
        assert!(hw.set_relay(true).is_err());
        assert!(!hw.relay_closed());
        assert_eq!(hw.relay_commands(), 0);
    }
}

//! Steering safety controller.
//!
//! Owns the control-enabled state, the operator override latch and the
//! trouble code set. Every control cycle the integration calls
//! [`SteeringSafetyController::run_safety_cycle`]; commands arriving from the
//! bus go through [`SteeringSafetyController::handle_command`].

use crate::config::SteeringThresholds;
use crate::error::SteeringResult;
use crate::faults::{FaultCode, FaultFlags};
use crate::guard::{RampSummary, SignalDiscontinuityGuard};
use crate::ports::{ActuationOutput, SteeringPorts};
use crate::report::{FaultCause, FaultReport, SteeringReport};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Control state owned by the steering controller.
///
/// `enabled` and `operator_override` are never both true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlState {
    /// Spoof output is connected and commands are applied.
    pub enabled: bool,
    /// The operator is overpowering the actuator.
    pub operator_override: bool,
    /// Latched trouble codes.
    pub fault_flags: FaultFlags,
}

/// Command delivered to the steering module by the bus layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SteeringCommand {
    /// Request control be enabled.
    Enable,
    /// Request control be disabled.
    Disable,
    /// Spoof values to apply while enabled.
    Torque {
        /// Requested high channel spoof value.
        spoof_high: u16,
        /// Requested low channel spoof value.
        spoof_low: u16,
    },
}

/// Safety state machine for the steering actuation module.
///
/// ```text
///            enable_control()
///            [no override]
///  Disabled ─────────────────► Enabled
///     ▲                           │
///     │  disable_control()        │
///     │  override detected        │
///     │  sensor fault latched     │
///     └───────────────────────────┘
/// ```
///
/// Relay transitions in both directions run the
/// [`SignalDiscontinuityGuard`] first, so they block for
/// `guard_samples` sensor reads.
///
/// # Example
///
/// ```rust
/// use dbw_steering::prelude::*;
///
/// let mut hw = SimulatedSteering::new(TorqueSample::new(480, 500));
/// let mut controller = SteeringSafetyController::new(SteeringThresholds::default())?;
///
/// controller.enable_control(&mut hw)?;
/// controller.update_steering(&mut hw, 5000, 10)?;
/// assert_eq!(hw.last_write(), Some(ActuationOutput::new(3031, 868)));
///
/// hw.queue_sample(TorqueSample::new(900, 0));
/// controller.check_for_operator_override(&mut hw)?;
/// assert!(!controller.is_enabled());
/// assert_eq!(hw.reports().len(), 1);
/// # Ok::<(), SteeringError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SteeringSafetyController {
    thresholds: SteeringThresholds,
    guard: SignalDiscontinuityGuard,
    state: ControlState,
    invalid_reads: u32,
    last_output: Option<ActuationOutput>,
}

impl SteeringSafetyController {
    /// Create a disabled controller with no latched faults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SteeringError::InvalidThreshold`] if the thresholds
    /// fail validation.
    pub fn new(thresholds: SteeringThresholds) -> SteeringResult<Self> {
        thresholds.validate()?;
        Ok(Self {
            guard: SignalDiscontinuityGuard::new(&thresholds),
            thresholds,
            state: ControlState::default(),
            invalid_reads: 0,
            last_output: None,
        })
    }

    /// Snapshot of the control state.
    #[must_use]
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Whether control is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Whether the operator override latch is set.
    #[must_use]
    pub fn operator_override(&self) -> bool {
        self.state.operator_override
    }

    /// Latched trouble codes.
    #[must_use]
    pub fn fault_flags(&self) -> FaultFlags {
        self.state.fault_flags
    }

    /// Consecutive invalid sensor reads seen by the fault check.
    #[must_use]
    pub fn invalid_read_count(&self) -> u32 {
        self.invalid_reads
    }

    /// Thresholds this controller was built with.
    #[must_use]
    pub fn thresholds(&self) -> &SteeringThresholds {
        &self.thresholds
    }

    /// Status report for the bus layer.
    #[must_use]
    pub fn report(&self) -> SteeringReport {
        SteeringReport {
            enabled: self.state.enabled,
            operator_override: self.state.operator_override,
            dtcs: self.state.fault_flags,
        }
    }

    /// One control cycle: operator override check, then sensor fault check.
    ///
    /// Both checks always run; the first error is returned after the second
    /// check has completed.
    ///
    /// # Errors
    ///
    /// Returns a port error raised while forcing control off.
    pub fn run_safety_cycle<P: SteeringPorts + ?Sized>(&mut self, ports: &mut P) -> SteeringResult {
        let override_result = self.check_for_operator_override(ports);
        let fault_result = self.check_for_sensor_faults(ports);
        override_result.and(fault_result)
    }

    /// Apply a command received from the bus.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying operation.
    pub fn handle_command<P: SteeringPorts + ?Sized>(
        &mut self,
        ports: &mut P,
        command: SteeringCommand,
    ) -> SteeringResult {
        match command {
            SteeringCommand::Enable => self.enable_control(ports),
            SteeringCommand::Disable => self.disable_control(ports),
            SteeringCommand::Torque {
                spoof_high,
                spoof_low,
            } => self.update_steering(ports, spoof_high, spoof_low),
        }
    }

    /// Detect the operator overpowering the actuator.
    ///
    /// Runs while enabled, and keeps running while the override latch is set
    /// so the latch can clear once the operator lets go. Either channel at or
    /// above the override threshold forces control off and latches the
    /// override. A report is published once, on the rising edge.
    ///
    /// # Errors
    ///
    /// Returns a port error raised while forcing control off. The override is
    /// latched and reported regardless.
    pub fn check_for_operator_override<P: SteeringPorts + ?Sized>(
        &mut self,
        ports: &mut P,
    ) -> SteeringResult {
        if !self.state.enabled && !self.state.operator_override {
            return Ok(());
        }

        let sample = match ports.read_torque() {
            Ok(sample) => sample,
            Err(err) => {
                tracing::debug!(error = %err, "Override check skipped, torque sensor unreadable");
                return Ok(());
            }
        };

        if !sample.exceeds(self.thresholds.override_threshold) {
            if self.state.operator_override {
                tracing::info!("Operator override released");
            }
            self.state.operator_override = false;
            return Ok(());
        }

        let was_enabled = self.state.enabled;
        let rising = !self.state.operator_override;
        let result = self.disable_control(ports);
        self.state.operator_override = true;

        if rising || was_enabled {
            ports.publish_fault_report(&FaultReport::steering(
                FaultCause::OperatorOverride,
                self.state.fault_flags,
            ));
            tracing::warn!(
                torque_high = sample.high,
                torque_low = sample.low,
                threshold = self.thresholds.override_threshold,
                "Operator override"
            );
        }

        result
    }

    /// Detect a disconnected or unreadable torque sensor.
    ///
    /// Runs while enabled, and keeps running while the invalid reading fault
    /// is latched so recovery is noticed even with control off. After
    /// `invalid_read_limit` consecutive invalid reads control is forced off,
    /// the fault latches and a report is published. One valid read clears
    /// the fault and resets the count.
    ///
    /// # Errors
    ///
    /// Returns a port error raised while forcing control off. The fault is
    /// latched and reported regardless.
    pub fn check_for_sensor_faults<P: SteeringPorts + ?Sized>(
        &mut self,
        ports: &mut P,
    ) -> SteeringResult {
        let code = FaultCode::InvalidSensorReading;
        let latched = self.state.fault_flags.has_fault(code);
        if !self.state.enabled && !latched {
            return Ok(());
        }

        let valid = match ports.read_torque() {
            Ok(sample) => sample.is_valid(self.thresholds.disconnected_sentinel),
            Err(err) => {
                tracing::debug!(error = %err, "Torque sensor read failed");
                false
            }
        };

        if valid {
            if latched {
                tracing::info!(fault = %code, "Torque sensor recovered");
            }
            self.state.fault_flags.clear_fault(code);
            self.invalid_reads = 0;
            return Ok(());
        }

        self.invalid_reads = self.invalid_reads.saturating_add(1);
        if self.invalid_reads < self.thresholds.invalid_read_limit {
            return Ok(());
        }

        let was_enabled = self.state.enabled;
        if latched && !was_enabled {
            return Ok(());
        }

        let result = self.disable_control(ports);
        self.state.fault_flags.set_fault(code);
        ports.publish_fault_report(&FaultReport::steering(
            FaultCause::Fault(code),
            self.state.fault_flags,
        ));
        tracing::warn!(
            consecutive = self.invalid_reads,
            fault = %code,
            "Bad value read from torque sensor"
        );

        result
    }

    /// Apply spoof commands to the actuation output.
    ///
    /// No-op unless enabled. Each value is clamped independently into
    /// `[spoof_min, spoof_max]`; out-of-range commands are normal upstream
    /// behaviour, not faults.
    ///
    /// # Errors
    ///
    /// Returns the port error if the output device rejects the write.
    pub fn update_steering<P: SteeringPorts + ?Sized>(
        &mut self,
        ports: &mut P,
        spoof_command_high: u16,
        spoof_command_low: u16,
    ) -> SteeringResult {
        if !self.state.enabled {
            return Ok(());
        }

        let output = ActuationOutput::new(
            self.thresholds.clamp_spoof(spoof_command_high),
            self.thresholds.clamp_spoof(spoof_command_low),
        );
        tracing::trace!(spoof_high = output.high, spoof_low = output.low, "Spoof output");

        ports.write_actuation(output)?;
        self.last_output = Some(output);
        Ok(())
    }

    /// Connect the spoof output.
    ///
    /// Only acts when disabled and no operator override is latched; otherwise
    /// a no-op. The output is ramped onto the sensor baseline before the
    /// relay closes.
    ///
    /// # Errors
    ///
    /// Returns the port error if the ramp or the relay fails; control stays
    /// disabled.
    pub fn enable_control<P: SteeringPorts + ?Sized>(&mut self, ports: &mut P) -> SteeringResult {
        if self.state.enabled || self.state.operator_override {
            tracing::debug!(
                enabled = self.state.enabled,
                operator_override = self.state.operator_override,
                "Enable request ignored"
            );
            return Ok(());
        }

        let ramp = self.guard.run(ports, self.last_output)?;
        self.record_ramp(&ramp);
        ports.set_relay(true)?;

        self.state.enabled = true;
        tracing::debug!(max_step = ramp.max_step, "Control enabled");
        Ok(())
    }

    /// Disconnect the spoof output.
    ///
    /// Only acts when enabled; otherwise a no-op, so repeated calls have no
    /// further side effects. The output is ramped onto the sensor baseline
    /// before the relay opens. Control is marked disabled even if the ramp or
    /// relay fails, so no further commands are applied.
    ///
    /// # Errors
    ///
    /// Returns the relay error, or else the ramp error.
    pub fn disable_control<P: SteeringPorts + ?Sized>(&mut self, ports: &mut P) -> SteeringResult {
        if !self.state.enabled {
            return Ok(());
        }

        let ramp = self.guard.run(ports, self.last_output);
        if let Ok(summary) = &ramp {
            self.record_ramp(summary);
        }
        let relay = ports.set_relay(false);

        self.state.enabled = false;
        tracing::debug!("Control disabled");

        relay?;
        ramp.map(|_| ())
    }

    fn record_ramp(&mut self, ramp: &RampSummary) {
        if ramp.steps > 0 {
            self.last_output = Some(ramp.baseline);
        }
    }
}

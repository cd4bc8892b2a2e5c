//! Command bus to the steering module.

use crate::error::CommanderError;
use dbw_steering::prelude::*;

/// Transport carrying steering commands to the module.
pub trait CommandBus {
    /// Open the bus on a channel index.
    ///
    /// # Errors
    ///
    /// Returns an error when the channel cannot be opened.
    fn open(&mut self, channel: i32) -> Result<(), CommanderError>;

    /// Send one command.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be delivered.
    fn send(&mut self, command: SteeringCommand) -> Result<(), CommanderError>;

    /// Called once after every poll's commands have been sent.
    ///
    /// # Errors
    ///
    /// Returns an error when the module reports a failure.
    fn end_cycle(&mut self) -> Result<(), CommanderError> {
        Ok(())
    }

    /// Latest status report from the module, if the bus carries one.
    fn report(&self) -> Option<SteeringReport> {
        None
    }

    /// Release the bus.
    fn close(&mut self);
}

/// In-process steering module on simulated hardware.
///
/// Commands go straight to a [`SteeringSafetyController`], and one safety
/// cycle runs at the end of every poll.
#[derive(Debug)]
pub struct LoopbackBus {
    controller: SteeringSafetyController,
    hardware: SimulatedSteering,
    channel: Option<i32>,
}

impl LoopbackBus {
    /// Sensor reading of a wheel nobody is holding.
    pub const RESTING_TORQUE: TorqueSample = TorqueSample::new(490, 510);

    /// Create a module with the given thresholds.
    ///
    /// # Errors
    ///
    /// Returns an error if the thresholds fail validation.
    pub fn new(thresholds: SteeringThresholds) -> Result<Self, CommanderError> {
        Ok(Self {
            controller: SteeringSafetyController::new(thresholds)?,
            hardware: SimulatedSteering::new(Self::RESTING_TORQUE),
            channel: None,
        })
    }

    /// Steering controller behind the bus.
    pub fn controller(&self) -> &SteeringSafetyController {
        &self.controller
    }

    /// Simulated hardware the controller drives.
    pub fn hardware(&self) -> &SimulatedSteering {
        &self.hardware
    }

    #[cfg(test)]
    pub fn hardware_mut(&mut self) -> &mut SimulatedSteering {
        &mut self.hardware
    }
}

impl CommandBus for LoopbackBus {
    fn open(&mut self, channel: i32) -> Result<(), CommanderError> {
        self.channel = Some(channel);
        tracing::debug!(channel, "Loopback steering module attached");
        Ok(())
    }

    fn send(&mut self, command: SteeringCommand) -> Result<(), CommanderError> {
        if self.channel.is_none() {
            return Err(CommanderError::Disconnected);
        }
        self.controller
            .handle_command(&mut self.hardware, command)
            .map_err(CommanderError::from)
    }

    fn end_cycle(&mut self) -> Result<(), CommanderError> {
        if self.channel.is_none() {
            return Err(CommanderError::Disconnected);
        }
        self.controller
            .run_safety_cycle(&mut self.hardware)
            .map_err(CommanderError::from)
    }

    fn report(&self) -> Option<SteeringReport> {
        Some(self.controller.report())
    }

    fn close(&mut self) {
        self.channel = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn send_before_open_is_disconnected() -> TestResult {
        let mut bus = LoopbackBus::new(SteeringThresholds::default())?;
        let result = bus.send(SteeringCommand::Enable);
        assert!(matches!(result, Err(CommanderError::Disconnected)));
        Ok(())
    }

    #[test]
    fn commands_reach_controller() -> TestResult {
        let mut bus = LoopbackBus::new(SteeringThresholds::default())?;
        bus.open(0)?;
        bus.send(SteeringCommand::Enable)?;
        bus.send(SteeringCommand::Torque {
            spoof_high: 2500,
            spoof_low: 1500,
        })?;
        bus.end_cycle()?;

        assert!(bus.controller().is_enabled());
        assert_eq!(
            bus.hardware().last_write(),
            Some(ActuationOutput::new(2500, 1500))
        );
        assert!(bus.report().is_some_and(|r| r.enabled));
        Ok(())
    }

    #[test]
    fn safety_cycle_catches_override() -> TestResult {
        let mut bus = LoopbackBus::new(SteeringThresholds::default())?;
        bus.open(0)?;
        bus.send(SteeringCommand::Enable)?;
        bus.hardware_mut().queue_sample(TorqueSample::new(900, 0));
        bus.end_cycle()?;

        assert!(bus.report().is_some_and(|r| r.operator_override && !r.enabled));
        assert_eq!(bus.hardware().reports().len(), 1);
        Ok(())
    }
}

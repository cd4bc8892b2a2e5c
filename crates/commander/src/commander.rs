//! Host-side commander: input in, steering commands out.

use crate::bus::CommandBus;
use crate::curve::TorqueSpoofCurve;
use crate::error::CommanderError;
use crate::input::InputSource;
use dbw_scheduler::{ChannelError, ChannelResult, CommandChannel};
use dbw_steering::{SteeringCommand, SteeringReport};

/// Polls an [`InputSource`] and forwards the resulting commands over a
/// [`CommandBus`]. Plugged into the command loop as its channel.
#[derive(Debug)]
pub struct Commander<I, B> {
    channel: i32,
    input: I,
    bus: B,
    curve: TorqueSpoofCurve,
    last_report: Option<SteeringReport>,
    open: bool,
}

impl<I: InputSource, B: CommandBus> Commander<I, B> {
    /// Open the bus on `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InitFailed`] if the bus cannot be opened.
    pub fn open(channel: i32, input: I, mut bus: B) -> Result<Self, ChannelError> {
        bus.open(channel)
            .map_err(|err| ChannelError::InitFailed {
                channel,
                reason: err.to_string(),
            })?;
        tracing::info!(channel, "Commander initialized");
        Ok(Self {
            channel,
            input,
            bus,
            curve: TorqueSpoofCurve::default(),
            last_report: None,
            open: true,
        })
    }

    pub fn with_curve(mut self, curve: TorqueSpoofCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    fn update(&mut self) -> Result<(), CommanderError> {
        let intent = self.input.read_intent()?;

        if intent.disable_requested {
            self.bus.send(SteeringCommand::Disable)?;
        } else if intent.enable_requested {
            self.bus.send(SteeringCommand::Enable)?;
        }

        let (spoof_high, spoof_low) = self.curve.spoof_for(intent.steering);
        self.bus.send(SteeringCommand::Torque {
            spoof_high,
            spoof_low,
        })?;
        self.bus.end_cycle()?;

        self.log_report_change();
        Ok(())
    }

    fn log_report_change(&mut self) {
        let report = self.bus.report();
        if report == self.last_report {
            return;
        }
        if let Some(r) = report {
            tracing::info!(
                enabled = r.enabled,
                operator_override = r.operator_override,
                dtcs = r.dtcs.bits(),
                "Steering status changed"
            );
        }
        self.last_report = report;
    }
}

fn to_channel_error(err: CommanderError) -> ChannelError {
    match err {
        CommanderError::Disconnected => ChannelError::Disconnected,
        other => ChannelError::dispatch_failed(other.to_string()),
    }
}

impl<I: InputSource, B: CommandBus> CommandChannel for Commander<I, B> {
    fn poll(&mut self) -> ChannelResult {
        self.update().map_err(to_channel_error)
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        if let Err(err) = self.bus.send(SteeringCommand::Disable) {
            tracing::warn!(error = %err, "Disable on close failed");
        }
        self.bus.close();
        self.open = false;
        tracing::info!(channel = self.channel, "Commander closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::LoopbackBus;
    use crate::input::{SteeringIntent, SweepInput};
    use dbw_steering::SteeringThresholds;
    use tracing_test::traced_test;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    /// Replays a fixed list of intents, then reports the device gone.
    struct Script(Vec<SteeringIntent>);

    impl InputSource for Script {
        fn read_intent(&mut self) -> Result<SteeringIntent, CommanderError> {
            if self.0.is_empty() {
                return Err(CommanderError::InputUnavailable("script ended".into()));
            }
            Ok(self.0.remove(0))
        }
    }

    #[derive(Default)]
    struct RecordingBus {
        sent: Vec<SteeringCommand>,
        cycles: u32,
        closes: u32,
        refuse_open: bool,
    }

    impl CommandBus for RecordingBus {
        fn open(&mut self, _channel: i32) -> Result<(), CommanderError> {
            if self.refuse_open {
                return Err(CommanderError::Disconnected);
            }
            Ok(())
        }

        fn send(&mut self, command: SteeringCommand) -> Result<(), CommanderError> {
            self.sent.push(command);
            Ok(())
        }

        fn end_cycle(&mut self) -> Result<(), CommanderError> {
            self.cycles += 1;
            Ok(())
        }

        fn close(&mut self) {
            self.closes += 1;
        }
    }

    fn intent(enable: bool, disable: bool) -> SteeringIntent {
        SteeringIntent {
            enable_requested: enable,
            disable_requested: disable,
            steering: 0.0,
        }
    }

    #[test]
    fn open_failure_is_init_failed() {
        let bus = RecordingBus {
            refuse_open: true,
            ..RecordingBus::default()
        };
        let result = Commander::open(7, Script(Vec::new()), bus);
        assert!(matches!(
            result,
            Err(ChannelError::InitFailed { channel: 7, .. })
        ));
    }

    #[test]
    fn disable_wins_over_enable() -> TestResult {
        let script = Script(vec![intent(true, true)]);
        let mut commander = Commander::open(0, script, RecordingBus::default())?;

        commander.poll()?;

        assert_eq!(
            commander.bus().sent.first(),
            Some(&SteeringCommand::Disable)
        );
        assert_eq!(commander.bus().sent.len(), 2);
        assert_eq!(commander.bus().cycles, 1);
        Ok(())
    }

    #[test]
    fn torque_sent_every_poll() -> TestResult {
        let script = Script(vec![intent(true, false), intent(false, false)]);
        let mut commander = Commander::open(0, script, RecordingBus::default())?;

        commander.poll()?;
        commander.poll()?;

        let torque = commander
            .bus()
            .sent
            .iter()
            .filter(|c| matches!(c, SteeringCommand::Torque { .. }))
            .count();
        assert_eq!(torque, 2);
        Ok(())
    }

    #[test]
    fn input_failure_is_dispatch_failure() -> TestResult {
        let mut commander = Commander::open(0, Script(Vec::new()), RecordingBus::default())?;
        let result = commander.poll();
        assert!(matches!(result, Err(ChannelError::DispatchFailed(_))));
        Ok(())
    }

    #[test]
    fn close_disables_once() -> TestResult {
        let mut commander = Commander::open(0, Script(Vec::new()), RecordingBus::default())?;

        commander.close();
        commander.close();

        assert_eq!(commander.bus().sent, vec![SteeringCommand::Disable]);
        assert_eq!(commander.bus().closes, 1);
        Ok(())
    }

    #[test]
    #[traced_test]
    fn status_changes_are_logged() -> TestResult {
        let bus = LoopbackBus::new(SteeringThresholds::default())?;
        let mut commander = Commander::open(3, SweepInput::default(), bus)?;

        commander.poll()?;
        commander.close();

        assert!(logs_contain("Steering status changed"));
        assert!(logs_contain("Commander closed"));
        Ok(())
    }

    #[test]
    fn sweep_over_loopback_enables_and_stays_in_range() -> TestResult {
        let bus = LoopbackBus::new(SteeringThresholds::default())?;
        let mut commander = Commander::open(0, SweepInput::new(1.0, 8), bus)?;

        for _ in 0..16 {
            commander.poll()?;
        }

        let module = commander.bus();
        assert!(module.controller().is_enabled());
        let thresholds = module.controller().thresholds();
        for write in module.hardware().writes().iter().skip(20) {
            assert!((thresholds.spoof_min..=thresholds.spoof_max).contains(&write.high));
            assert!((thresholds.spoof_min..=thresholds.spoof_max).contains(&write.low));
        }
        Ok(())
    }

    #[test]
    fn close_over_loopback_opens_relay() -> TestResult {
        let bus = LoopbackBus::new(SteeringThresholds::default())?;
        let mut commander = Commander::open(0, SweepInput::default(), bus)?;
        commander.poll()?;
        assert!(commander.bus().hardware().relay_closed());

        commander.close();

        assert!(!commander.bus().hardware().relay_closed());
        assert!(!commander.bus().controller().is_enabled());
        Ok(())
    }
}

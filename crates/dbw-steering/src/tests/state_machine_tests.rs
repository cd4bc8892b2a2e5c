//! State machine tests for the steering controller.

use crate::sim::SimulatedSteering;
use crate::*;

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SteeringState {
    Disabled,
    Enabled,
    Overridden,
    Faulted,
}

impl SteeringSafetyController {
    fn observed(&self) -> SteeringState {
        let state = self.state();
        if state.enabled {
            SteeringState::Enabled
        } else if state.operator_override {
            SteeringState::Overridden
        } else if !state.fault_flags.is_empty() {
            SteeringState::Faulted
        } else {
            SteeringState::Disabled
        }
    }
}

fn setup() -> Result<(SteeringSafetyController, SimulatedSteering), SteeringError> {
    Ok((
        SteeringSafetyController::new(SteeringThresholds::default())?,
        SimulatedSteering::new(TorqueSample::new(512, 512)),
    ))
}

#[test]
fn test_state_machine_initial_state() -> Result<(), SteeringError> {
    let (controller, _) = setup()?;
    assert_eq!(controller.observed(), SteeringState::Disabled);
    Ok(())
}

#[test]
fn test_state_machine_enable_disable_cycle() -> Result<(), SteeringError> {
    let (mut controller, mut hw) = setup()?;

    controller.enable_control(&mut hw)?;
    assert_eq!(controller.observed(), SteeringState::Enabled);

    controller.disable_control(&mut hw)?;
    assert_eq!(controller.observed(), SteeringState::Disabled);

    controller.enable_control(&mut hw)?;
    assert_eq!(controller.observed(), SteeringState::Enabled);
    Ok(())
}

#[test]
fn test_state_machine_override_then_release() -> Result<(), SteeringError> {
    let (mut controller, mut hw) = setup()?;
    controller.enable_control(&mut hw)?;

    hw.queue_sample(TorqueSample::new(1023, 0));
    controller.run_safety_cycle(&mut hw)?;
    assert_eq!(controller.observed(), SteeringState::Overridden);

    // operator lets go
    controller.run_safety_cycle(&mut hw)?;
    assert_eq!(controller.observed(), SteeringState::Disabled);

    controller.enable_control(&mut hw)?;
    assert_eq!(controller.observed(), SteeringState::Enabled);
    assert_eq!(hw.reports().len(), 1);
    Ok(())
}

#[test]
fn test_state_machine_sensor_fault_and_recovery() -> Result<(), SteeringError> {
    let (mut controller, mut hw) = setup()?;
    controller.enable_control(&mut hw)?;

    hw.set_resting(TorqueSample::new(-1, -1));
    for _ in 0..4 {
        controller.run_safety_cycle(&mut hw)?;
    }
    assert_eq!(controller.observed(), SteeringState::Faulted);

    hw.set_resting(TorqueSample::new(512, 512));
    controller.run_safety_cycle(&mut hw)?;
    assert_eq!(controller.observed(), SteeringState::Disabled);
    Ok(())
}

#[test]
fn test_state_machine_never_enabled_and_overridden() -> Result<(), SteeringError> {
    let (mut controller, mut hw) = setup()?;
    let torques = [100, 900, 900, 200, 800, 0, 760, 10];

    for (i, torque) in torques.into_iter().enumerate() {
        if i % 2 == 0 {
            controller.enable_control(&mut hw)?;
        }
        hw.queue_sample(TorqueSample::new(torque, torque));
        controller.check_for_operator_override(&mut hw)?;

        let state = controller.state();
        assert!(!(state.enabled && state.operator_override));
    }
    Ok(())
}

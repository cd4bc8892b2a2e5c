//! Prelude for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use dbw_steering::prelude::*;
//! ```

pub use crate::{
    ActuationOutput, ActuationOutputPort, ControlState, FaultCause, FaultCode, FaultFlags,
    FaultOrigin, FaultReport, FaultReporter, PortError, RampSummary, SignalDiscontinuityGuard,
    SteeringCommand, SteeringError, SteeringPorts, SteeringReport, SteeringResult,
    SteeringSafetyController, SteeringThresholds, TorqueSample, TorqueSensorPort,
};

#[cfg(any(test, feature = "sim"))]
pub use crate::sim::SimulatedSteering;

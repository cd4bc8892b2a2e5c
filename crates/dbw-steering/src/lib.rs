//! Steering actuation safety controller for drive-by-wire retrofits.
//!
//! The steering module sits between the column's dual-channel torque sensor
//! and the power steering controller. While control is enabled a relay
//! substitutes spoofed torque signals for the real ones, and this crate
//! decides when that substitution is allowed.
//!
//! # Architecture
//!
//! - **SteeringSafetyController**: the safety state machine
//! - **SteeringThresholds**: fixed detection thresholds and output bounds
//! - **SignalDiscontinuityGuard**: ramps the spoof output onto the live
//!   sensor baseline before every relay transition
//! - **Ports**: traits through which the controller reaches the torque
//!   sensor, the spoof output and relay, and the fault report bus
//!
//! # State Machine
//!
//! ```text
//! ┌─────────────┐   enable_control()    ┌─────────────┐
//! │  Disabled   │──────────────────────►│   Enabled   │
//! │             │◄──────────────────────│             │
//! └─────────────┘   disable_control()   └─────────────┘
//!        ▲          override detected          │
//!        │          sensor fault latched       │
//!        └─────────────────────────────────────┘
//! ```
//!
//! An operator override latch blocks re-enabling until the operator lets go.
//! A latched sensor fault does not block re-enabling, but the next invalid
//! read forces control off again.
//!
//! # Example
//!
//! ```rust
//! use dbw_steering::prelude::*;
//!
//! let mut hw = SimulatedSteering::new(TorqueSample::new(500, 500));
//! let mut controller = SteeringSafetyController::new(SteeringThresholds::default())?;
//!
//! controller.handle_command(&mut hw, SteeringCommand::Enable)?;
//! controller.run_safety_cycle(&mut hw)?;
//! assert!(controller.is_enabled());
//! # Ok::<(), SteeringError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod config;
mod controller;
mod error;
mod faults;
mod guard;
mod ports;
mod report;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub mod prelude;

pub use config::SteeringThresholds;
pub use controller::{ControlState, SteeringCommand, SteeringSafetyController};
pub use error::{PortError, SteeringError, SteeringResult};
pub use faults::{FaultCode, FaultFlags};
pub use guard::{RampSummary, SignalDiscontinuityGuard};
pub use ports::{
    ActuationOutput, ActuationOutputPort, FaultReporter, SteeringPorts, TorqueSample,
    TorqueSensorPort,
};
pub use report::{FaultCause, FaultOrigin, FaultReport, SteeringReport};

#[cfg(test)]
mod tests;

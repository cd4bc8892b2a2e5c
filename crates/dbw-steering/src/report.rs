//! Fault and status reports published by the steering module.

use crate::faults::{FaultCode, FaultFlags};
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Module that raised a fault report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaultOrigin {
    /// Steering actuation module.
    Steering,
}

/// Why control was forcibly disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaultCause {
    /// The operator overpowered the actuator.
    OperatorOverride,
    /// A diagnostic trouble code latched.
    Fault(FaultCode),
}

impl fmt::Display for FaultCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultCause::OperatorOverride => write!(f, "Operator override"),
            FaultCause::Fault(code) => write!(f, "{code}"),
        }
    }
}

/// Report emitted once per transition into a forced-disable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaultReport {
    /// Reporting module.
    pub origin: FaultOrigin,
    /// Condition that forced the disable.
    pub cause: FaultCause,
    /// Trouble codes latched at the time of the report.
    pub dtcs: FaultFlags,
}

impl FaultReport {
    /// Create a steering fault report.
    #[must_use]
    pub fn steering(cause: FaultCause, dtcs: FaultFlags) -> Self {
        Self {
            origin: FaultOrigin::Steering,
            cause,
            dtcs,
        }
    }
}

/// Periodic status snapshot for the bus layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SteeringReport {
    /// Control is enabled and spoof output is connected.
    pub enabled: bool,
    /// The operator is currently overriding.
    pub operator_override: bool,
    /// Latched trouble codes.
    pub dtcs: FaultFlags,
}

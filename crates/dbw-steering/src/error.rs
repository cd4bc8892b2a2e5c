//! Error types for steering port and controller operations.

use thiserror::Error;

/// Failures reported by the sensor, actuator and relay ports.
///
/// Ports communicate failure to the controller instead of aborting; the
/// controller decides whether a failure is fatal for the current transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// The torque sensor could not be sampled.
    #[error("Torque sensor unavailable: {0}")]
    SensorUnavailable(String),

    /// The actuation output device refused a write.
    #[error("Actuation output rejected: {0}")]
    OutputRejected(String),

    /// The spoof enable relay could not be switched.
    #[error("Relay could not be switched (requested closed: {requested})")]
    RelayFault {
        /// Requested relay state (`true` = closed / control enabled).
        requested: bool,
    },
}

impl PortError {
    /// Create a sensor unavailable error.
    #[must_use]
    pub fn sensor_unavailable(reason: impl Into<String>) -> Self {
        Self::SensorUnavailable(reason.into())
    }

    /// Create an output rejected error.
    #[must_use]
    pub fn output_rejected(reason: impl Into<String>) -> Self {
        Self::OutputRejected(reason.into())
    }
}

/// Errors surfaced by the steering safety controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SteeringError {
    /// A hardware port failed while servicing a controller operation.
    #[error(transparent)]
    Port(#[from] PortError),

    /// A threshold is outside its permitted range.
    #[error("Invalid threshold '{name}': {reason}")]
    InvalidThreshold {
        /// Name of the offending threshold.
        name: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

impl SteeringError {
    /// Create an invalid threshold error.
    #[must_use]
    pub fn invalid_threshold(name: &'static str, reason: &'static str) -> Self {
        Self::InvalidThreshold { name, reason }
    }

    /// Whether the error came from hardware rather than configuration.
    #[must_use]
    pub fn is_port_failure(&self) -> bool {
        matches!(self, Self::Port(_))
    }
}

/// Result type for steering operations.
pub type SteeringResult<T = ()> = Result<T, SteeringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_display() {
        let err = PortError::sensor_unavailable("adc timeout");
        assert_eq!(err.to_string(), "Torque sensor unavailable: adc timeout");

        let err = PortError::RelayFault { requested: false };
        assert_eq!(
            err.to_string(),
            "Relay could not be switched (requested closed: false)"
        );
    }

    #[test]
    fn test_steering_error_from_port() {
        let err: SteeringError = PortError::output_rejected("spi busy").into();
        assert!(err.is_port_failure());
        assert_eq!(err.to_string(), "Actuation output rejected: spi busy");
    }

    #[test]
    fn test_invalid_threshold_display() {
        let err = SteeringError::invalid_threshold("guard_samples", "must be greater than 0");
        assert!(!err.is_port_failure());
        assert!(err.to_string().contains("guard_samples"));
    }
}

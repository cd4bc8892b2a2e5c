//! Diagnostic trouble codes and the sticky fault set.

use bitflags::bitflags;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Diagnostic trouble codes raised by the steering module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaultCode {
    /// The torque sensor returned the disconnected sentinel on consecutive reads.
    InvalidSensorReading,
}

impl FaultCode {
    /// All codes known to the steering module.
    pub const ALL: [FaultCode; 1] = [FaultCode::InvalidSensorReading];

    /// The bit this code occupies in a [`FaultFlags`] set.
    #[must_use]
    pub fn flag(self) -> FaultFlags {
        match self {
            FaultCode::InvalidSensorReading => FaultFlags::INVALID_SENSOR_READING,
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultCode::InvalidSensorReading => write!(f, "Invalid torque sensor reading"),
        }
    }
}

bitflags! {
    /// Set of active diagnostic trouble codes.
    ///
    /// A code is sticky: once set it stays set until the condition that
    /// raised it explicitly clears it.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct FaultFlags: u8 {
        /// See [`FaultCode::InvalidSensorReading`].
        const INVALID_SENSOR_READING = 0b0000_0001;
    }
}

impl FaultFlags {
    /// Latch a fault code.
    pub fn set_fault(&mut self, code: FaultCode) {
        self.insert(code.flag());
    }

    /// Clear a fault code.
    pub fn clear_fault(&mut self, code: FaultCode) {
        self.remove(code.flag());
    }

    /// Check whether a fault code is latched.
    #[must_use]
    pub fn has_fault(&self, code: FaultCode) -> bool {
        self.contains(code.flag())
    }

    /// Iterate the latched fault codes.
    pub fn active_codes(&self) -> impl Iterator<Item = FaultCode> + '_ {
        FaultCode::ALL
            .into_iter()
            .filter(move |code| self.has_fault(*code))
    }
}

impl From<FaultCode> for FaultFlags {
    fn from(code: FaultCode) -> Self {
        code.flag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_flags_start_empty() {
        let flags = FaultFlags::default();
        assert!(flags.is_empty());
        assert!(!flags.has_fault(FaultCode::InvalidSensorReading));
        assert_eq!(flags.active_codes().count(), 0);
    }

    #[test]
    fn test_fault_flags_set_is_sticky_until_cleared() {
        let mut flags = FaultFlags::default();
        flags.set_fault(FaultCode::InvalidSensorReading);
        flags.set_fault(FaultCode::InvalidSensorReading);
        assert!(flags.has_fault(FaultCode::InvalidSensorReading));
        assert_eq!(flags.bits(), 0b0000_0001);

        flags.clear_fault(FaultCode::InvalidSensorReading);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_active_codes() {
        let flags = FaultFlags::from(FaultCode::InvalidSensorReading);
        let codes: Vec<_> = flags.active_codes().collect();
        assert_eq!(codes, vec![FaultCode::InvalidSensorReading]);
    }

    #[test]
    fn test_fault_code_display() {
        assert_eq!(
            FaultCode::InvalidSensorReading.to_string(),
            "Invalid torque sensor reading"
        );
    }
}

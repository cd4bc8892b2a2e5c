//! Steering position to torque spoof conversion.

/// Linear torque spoof calibration.
///
/// The normalized steering position is scaled to a torque request, then each
/// channel maps torque to a voltage (`slope * torque + offset`) and the
/// voltage to DAC counts. The two channels slope in opposite directions, the
/// way the column's real sensor does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorqueSpoofCurve {
    /// Torque requested at full steering deflection.
    pub torque_scale: f64,
    /// High channel volts per unit torque.
    pub high_slope: f64,
    /// High channel volts at zero torque.
    pub high_offset: f64,
    /// Low channel volts per unit torque.
    pub low_slope: f64,
    /// Low channel volts at zero torque.
    pub low_offset: f64,
    /// DAC counts per volt.
    pub counts_per_volt: f64,
}

impl Default for TorqueSpoofCurve {
    fn default() -> Self {
        Self {
            torque_scale: 10.0,
            high_slope: 0.135,
            high_offset: 2.39,
            low_slope: -0.145,
            low_offset: 2.42,
            counts_per_volt: 819.2,
        }
    }
}

impl TorqueSpoofCurve {
    /// Spoof `(high, low)` DAC values for a steering position in `[-1, 1]`.
    ///
    /// The result is not clamped to the module's spoof range; the module
    /// clamps on receipt.
    pub fn spoof_for(&self, steering: f64) -> (u16, u16) {
        let steering = if steering.is_finite() {
            steering.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let torque = steering * self.torque_scale;
        let high = (self.high_slope * torque + self.high_offset) * self.counts_per_volt;
        let low = (self.low_slope * torque + self.low_offset) * self.counts_per_volt;
        (to_counts(high), to_counts(low))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to the u16 range and rounded first"
)]
fn to_counts(value: f64) -> u16 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

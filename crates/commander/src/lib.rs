//! Host-side steering commander.
//!
//! Reads operator intent from an [`input::InputSource`], converts steering
//! position to torque spoof values through [`curve::TorqueSpoofCurve`] and
//! sends [`dbw_steering::SteeringCommand`]s over a [`bus::CommandBus`]. The
//! [`commander::Commander`] is the channel the command loop polls.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod bus;
pub mod cli;
pub mod commander;
pub mod curve;
pub mod error;
pub mod input;

pub mod prelude {
    //! Common commander types.
    pub use crate::bus::{CommandBus, LoopbackBus};
    pub use crate::commander::Commander;
    pub use crate::curve::TorqueSpoofCurve;
    pub use crate::error::CommanderError;
    pub use crate::input::{InputSource, SteeringIntent, SweepInput};
}

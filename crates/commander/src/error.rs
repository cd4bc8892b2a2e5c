//! Error types for the commander.

use dbw_steering::SteeringError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommanderError {
    #[error("Input device unavailable: {0}")]
    InputUnavailable(String),

    #[error("Steering module disconnected")]
    Disconnected,

    #[error("Steering module error: {0}")]
    Module(#[from] SteeringError),
}

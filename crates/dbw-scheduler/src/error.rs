//! Error types for the scheduler crate.

use thiserror::Error;

/// Failures reported by a host command channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The channel could not be opened.
    #[error("Command channel {channel} failed to initialize: {reason}")]
    InitFailed {
        /// Channel index passed on the command line.
        channel: i32,
        /// Underlying cause.
        reason: String,
    },
    /// The peer went away mid-run.
    #[error("Command channel disconnected")]
    Disconnected,
    /// A command could not be delivered.
    #[error("Command dispatch failed: {0}")]
    DispatchFailed(String),
}

impl ChannelError {
    /// Shorthand for [`ChannelError::DispatchFailed`].
    pub fn dispatch_failed(reason: impl Into<String>) -> Self {
        Self::DispatchFailed(reason.into())
    }
}

/// Scheduler configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// A configuration parameter is out of range.
    #[error("Invalid scheduler configuration: {name} {reason}")]
    InvalidConfig {
        /// Offending field.
        name: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Channel operation result.
pub type ChannelResult<T = ()> = Result<T, ChannelError>;

/// Scheduler result.
pub type SchedulerResult<T = ()> = Result<T, SchedulerError>;

//! Prelude module for common scheduler types.

pub use crate::clock::{ManualClock, SystemClock, TimeSource};
pub use crate::error::{ChannelError, ChannelResult, SchedulerError, SchedulerResult};
pub use crate::scheduler::{
    CommandChannel, CommandLoopScheduler, LoopExit, LoopOutcome, LoopState, LoopStats,
    SchedulerConfig,
};
pub use crate::stop::StopSignal;

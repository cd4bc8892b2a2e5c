//! Fixed-rate cooperative command loop for drive-by-wire host tools.
//!
//! This crate provides the host-side cyclic executive that polls a command
//! channel at a fixed minimum interval:
//!
//! - **CommandLoopScheduler**: the loop, with `Running` and `Stopping` states
//! - **CommandChannel**: the seam to whatever acquires and sends commands
//! - **TimeSource**: monotonic clock plus sleep, with a manual clock for tests
//! - **StopSignal**: atomic flag a signal handler raises to end the loop
//!
//! # Example
//!
//! ```no_run
//! use dbw_scheduler::prelude::*;
//!
//! struct Heartbeat;
//!
//! impl CommandChannel for Heartbeat {
//!     fn poll(&mut self) -> ChannelResult {
//!         Ok(())
//!     }
//!     fn close(&mut self) {}
//! }
//!
//! let stop = StopSignal::new();
//! let mut scheduler = CommandLoopScheduler::new(SchedulerConfig::default())?;
//! let outcome = scheduler.run(&mut Heartbeat, &stop);
//! println!("{:?}", outcome.exit);
//! # Ok::<(), SchedulerError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(unused_must_use)]

pub mod clock;
pub mod error;
pub mod scheduler;
pub mod stop;

pub mod prelude;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use error::{ChannelError, ChannelResult, SchedulerError, SchedulerResult};
pub use scheduler::{
    CommandChannel, CommandLoopScheduler, LoopExit, LoopOutcome, LoopState, LoopStats,
    SchedulerConfig,
};
pub use stop::StopSignal;

//! Fixed-rate cooperative command loop.
//!
//! The loop wakes every `sleep_tick`, and once more than `update_interval`
//! has passed since the last dispatch it polls the command channel. The
//! reference time is reset to "now" before each poll, so lateness is not
//! compensated and the effective period is `update_interval` plus up to one
//! tick plus the poll duration.

use crate::clock::{SystemClock, TimeSource};
use crate::error::{ChannelError, ChannelResult, SchedulerError, SchedulerResult};
use crate::stop::StopSignal;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Host side of a command channel.
pub trait CommandChannel {
    /// Acquire the latest operator input and dispatch the resulting commands.
    ///
    /// # Errors
    ///
    /// Any error is fatal and ends the loop.
    fn poll(&mut self) -> ChannelResult;

    /// Release the channel. Called exactly once when the loop exits.
    fn close(&mut self);
}

/// Loop timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Minimum time between polls. A poll fires only once elapsed time is
    /// strictly greater than this.
    pub update_interval: Duration,
    /// Sleep between loop iterations.
    pub sleep_tick: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_millis(50),
            sleep_tick: Duration::from_millis(1),
        }
    }
}

impl SchedulerConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] for a zero tick, a zero
    /// interval, or a tick longer than the interval.
    pub fn validate(&self) -> SchedulerResult {
        if self.sleep_tick.is_zero() {
            return Err(SchedulerError::InvalidConfig {
                name: "sleep_tick",
                reason: "must be greater than 0",
            });
        }
        if self.update_interval.is_zero() {
            return Err(SchedulerError::InvalidConfig {
                name: "update_interval",
                reason: "must be greater than 0",
            });
        }
        if self.sleep_tick > self.update_interval {
            return Err(SchedulerError::InvalidConfig {
                name: "sleep_tick",
                reason: "must not exceed update_interval",
            });
        }
        Ok(())
    }
}

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Not started yet.
    #[default]
    Idle,
    /// Polling the channel.
    Running,
    /// Loop exited and the channel was closed.
    Stopping,
}

/// Why the loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit {
    /// The stop signal was raised.
    Stopped,
    /// A poll returned a fatal error.
    ChannelFault(ChannelError),
}

/// Counters collected over one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    /// Loop iterations executed.
    pub cycles: u64,
    /// Polls issued, including a failing one.
    pub dispatches: u64,
}

/// Result of [`CommandLoopScheduler::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    /// Exit reason.
    pub exit: LoopExit,
    /// Counters.
    pub stats: LoopStats,
}

/// Cyclic executive driving a [`CommandChannel`].
///
/// # Example
///
/// ```rust
/// use dbw_scheduler::prelude::*;
/// use std::time::Duration;
///
/// struct Once(StopSignal);
///
/// impl CommandChannel for Once {
///     fn poll(&mut self) -> ChannelResult {
///         self.0.trigger();
///         Ok(())
///     }
///     fn close(&mut self) {}
/// }
///
/// let stop = StopSignal::new();
/// let clock = ManualClock::new();
/// let mut scheduler = CommandLoopScheduler::with_clock(SchedulerConfig::default(), clock.clone())?;
///
/// let outcome = scheduler.run(&mut Once(stop.clone()), &stop);
/// assert_eq!(outcome.exit, LoopExit::Stopped);
/// assert_eq!(outcome.stats.dispatches, 1);
/// assert_eq!(clock.now(), Duration::from_millis(52));
/// # Ok::<(), SchedulerError>(())
/// ```
#[derive(Debug)]
pub struct CommandLoopScheduler<T: TimeSource = SystemClock> {
    config: SchedulerConfig,
    clock: T,
    state: LoopState,
}

impl CommandLoopScheduler<SystemClock> {
    /// Create a scheduler on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: SchedulerConfig) -> SchedulerResult<Self> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<T: TimeSource> CommandLoopScheduler<T> {
    /// Create a scheduler on a custom time source.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if `config` fails validation.
    pub fn with_clock(config: SchedulerConfig, clock: T) -> SchedulerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            state: LoopState::Idle,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Timing configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run until `stop` is raised or a poll fails, then close `channel`.
    ///
    /// `channel` must already be initialized. The stop flag is checked once
    /// per iteration; a poll in flight always completes.
    pub fn run<C>(&mut self, channel: &mut C, stop: &StopSignal) -> LoopOutcome
    where
        C: CommandChannel + ?Sized,
    {
        self.state = LoopState::Running;
        tracing::debug!(
            interval_ms = self.config.update_interval.as_millis(),
            "Command loop running"
        );

        let mut stats = LoopStats::default();
        let mut last_update = self.clock.now();

        let exit = loop {
            if stop.is_set() {
                break LoopExit::Stopped;
            }
            stats.cycles = stats.cycles.saturating_add(1);

            let now = self.clock.now();
            if now.saturating_sub(last_update) > self.config.update_interval {
                last_update = now;
                stats.dispatches = stats.dispatches.saturating_add(1);
                if let Err(err) = channel.poll() {
                    tracing::error!(error = %err, "Command channel failed");
                    break LoopExit::ChannelFault(err);
                }
            }

            self.clock.sleep(self.config.sleep_tick);
        };

        self.state = LoopState::Stopping;
        channel.close();
        tracing::info!(
            cycles = stats.cycles,
            dispatches = stats.dispatches,
            "Command loop stopped"
        );

        LoopOutcome { exit, stats }
    }
}

//! Property-based tests for loop cadence.

use dbw_scheduler::prelude::*;
use proptest::prelude::*;
use std::time::Duration;

struct Counter {
    clock: ManualClock,
    stop: StopSignal,
    limit: usize,
    times: Vec<Duration>,
}

impl CommandChannel for Counter {
    fn poll(&mut self) -> ChannelResult {
        self.times.push(self.clock.now());
        if self.times.len() >= self.limit {
            self.stop.trigger();
        }
        Ok(())
    }

    fn close(&mut self) {}
}

proptest! {
    #[test]
    fn test_gap_between_polls_exceeds_interval(
        interval_ms in 1u64..200,
        tick_ms in 1u64..20,
        polls in 1usize..8,
    ) {
        prop_assume!(tick_ms <= interval_ms);
        let config = SchedulerConfig {
            update_interval: Duration::from_millis(interval_ms),
            sleep_tick: Duration::from_millis(tick_ms),
        };
        let clock = ManualClock::new();
        let stop = StopSignal::new();
        let mut channel = Counter {
            clock: clock.clone(),
            stop: stop.clone(),
            limit: polls,
            times: Vec::new(),
        };
        let mut scheduler = CommandLoopScheduler::with_clock(config, clock)?;

        let outcome = scheduler.run(&mut channel, &stop);

        prop_assert_eq!(outcome.stats.dispatches, polls as u64);
        let mut last = Duration::ZERO;
        for t in &channel.times {
            let gap = t.saturating_sub(last);
            prop_assert!(gap > config.update_interval);
            prop_assert!(gap <= config.update_interval + config.sleep_tick);
            last = *t;
        }
    }
}

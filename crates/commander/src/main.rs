//! dbw-commander - drive a steering module from the host
//!
//! Polls operator input every 50 ms and forwards enable, disable and torque
//! spoof commands until interrupted with Ctrl-C.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use clap::Parser;
use dbw_commander::cli::{self, Cli};
use dbw_commander::prelude::*;
use dbw_scheduler::prelude::*;
use dbw_steering::SteeringThresholds;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return cli::parse_failure(&err),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Startup failures and channel faults are logged, not reflected in the
    // exit status.
    if let Err(err) = run(&cli) {
        tracing::error!("{err:#}");
    }
    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
    let stop = StopSignal::new();
    {
        let handler = stop.clone();
        ctrlc::set_handler(move || handler.trigger())
            .context("failed to install Ctrl-C handler")?;
    }
    if let Some(ms) = cli.stop_after {
        let timer = stop.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(ms));
            timer.trigger();
        });
    }

    let bus = LoopbackBus::new(SteeringThresholds::default())
        .context("failed to build steering module")?;
    let mut commander = Commander::open(cli.channel, SweepInput::default(), bus)
        .context("failed to initialize commander")?;

    let mut scheduler = CommandLoopScheduler::new(SchedulerConfig::default())
        .context("invalid scheduler configuration")?;
    let outcome = scheduler.run(&mut commander, &stop);

    let module = commander.bus();
    tracing::info!(
        dispatches = outcome.stats.dispatches,
        fault_reports = module.hardware().reports().len(),
        enabled = module.controller().is_enabled(),
        "Commander finished"
    );

    match outcome.exit {
        LoopExit::Stopped => Ok(()),
        LoopExit::ChannelFault(err) => Err(err).context("command channel failed"),
    }
}

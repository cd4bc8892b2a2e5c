//! Command-line parsing.

use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;

pub const BIN_NAME: &str = "dbw-commander";

#[derive(Parser, Debug)]
#[command(name = BIN_NAME)]
#[command(about = "Drive a steering module over a command channel")]
#[command(version)]
pub struct Cli {
    /// Command channel index
    #[arg(allow_negative_numbers = true)]
    pub channel: i32,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Stop on its own after this many milliseconds (for smoke tests)
    #[arg(long, hide = true, value_name = "MS")]
    pub stop_after: Option<u64>,
}

impl Cli {
    /// `EnvFilter` directive for the workspace crates at the requested verbosity.
    pub fn log_filter(&self) -> String {
        let level = match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        format!("dbw_commander={level},dbw_steering={level},dbw_scheduler={level}")
    }
}

/// Report a parse failure and pick the exit code.
///
/// Help and version go through clap and exit cleanly. Anything else prints
/// the one-line usage on stdout and exits 1.
pub fn parse_failure(err: &clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if let Err(print_err) = err.print() {
                eprintln!("{print_err}");
            }
            ExitCode::SUCCESS
        }
        _ => {
            println!("usage {BIN_NAME} channel");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_channel() -> TestResult {
        let cli = Cli::try_parse_from([BIN_NAME, "0"])?;
        assert_eq!(cli.channel, 0);
        assert_eq!(cli.verbose, 0);
        assert!(cli.stop_after.is_none());
        Ok(())
    }

    #[test]
    fn parse_negative_channel() -> TestResult {
        let cli = Cli::try_parse_from([BIN_NAME, "-1"])?;
        assert_eq!(cli.channel, -1);

        let cli = Cli::try_parse_from([BIN_NAME, "-v", "-3"])?;
        assert_eq!(cli.channel, -3);
        assert_eq!(cli.verbose, 1);
        Ok(())
    }

    #[test]
    fn reject_missing_channel() {
        let err = Cli::try_parse_from([BIN_NAME]);
        assert!(err.is_err_and(|e| e.kind() == ErrorKind::MissingRequiredArgument));
    }

    #[test]
    fn reject_non_numeric_channel() {
        assert!(Cli::try_parse_from([BIN_NAME, "can0"]).is_err());
    }

    #[test]
    fn reject_extra_positional() {
        assert!(Cli::try_parse_from([BIN_NAME, "0", "1"]).is_err());
    }

    #[test]
    fn verbose_raises_log_level() -> TestResult {
        let cli = Cli::try_parse_from([BIN_NAME, "-vv", "2"])?;
        assert_eq!(
            cli.log_filter(),
            "dbw_commander=trace,dbw_steering=trace,dbw_scheduler=trace"
        );
        Ok(())
    }
}

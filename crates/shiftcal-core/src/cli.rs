use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::period::{InvalidAnchorError, PeriodRequest};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "shiftcal",
    version,
    about = "Payroll period calendar (16th to 15th) and shift configuration viewer"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Shift config JSON file.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// IANA timezone used to decide what "today" is.
    #[arg(long = "timezone", global = true)]
    pub timezone: Option<String>,

    /// Pretend today is this date (YYYY-MM-DD).
    #[arg(long = "today", global = true)]
    pub today: Option<NaiveDate>,

    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the payroll period.
    Period(PeriodArgs),
    /// Print the merged shift configuration.
    Config(OutputArgs),
    /// Print the payroll period together with the shift configuration.
    Show(PeriodArgs),
}

impl Default for Command {
    fn default() -> Self {
        Self::Show(PeriodArgs::default())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct PeriodArgs {
    /// Anchor year; requires --month.
    #[arg(long)]
    pub year: Option<String>,

    /// Anchor month (1-12), the month whose 15th ends the period.
    #[arg(long)]
    pub month: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl PeriodArgs {
    pub fn request(&self) -> Result<PeriodRequest, InvalidAnchorError> {
        parse_period_query(self.year.as_deref(), self.month.as_deref())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    #[arg(long)]
    pub json: bool,
}

/// Log level used when `RUST_LOG` is unset. Quiet flags win over verbose ones.
pub fn default_filter(verbose: u8, quiet: u8) -> LevelFilter {
    match (quiet, verbose) {
        (2.., _) => LevelFilter::ERROR,
        (1, _) | (0, 0) => LevelFilter::WARN,
        (0, 1) => LevelFilter::INFO,
        (0, 2) => LevelFilter::DEBUG,
        (0, _) => LevelFilter::TRACE,
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(default_filter(verbose, quiet).into())
        .from_env()
        .map_err(|e| anyhow!("invalid RUST_LOG: {e}"))?;

    let stderr = std::io::stderr;
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .with_ansi(stderr().is_terminal())
        .with_target(false)
        .try_init()
    {
        debug!(error = %err, "subscriber already installed");
    }

    Ok(())
}

/// Turns the optional raw `year`/`month` query values into a request. Both
/// absent means "today"; a lone value or a non-integer is rejected.
pub fn parse_period_query(
    year: Option<&str>,
    month: Option<&str>,
) -> Result<PeriodRequest, InvalidAnchorError> {
    match (year, month) {
        (None, None) => Ok(PeriodRequest::Today),
        (Some(_), None) => Err(InvalidAnchorError::Incomplete {
            missing: "month",
            present: "year",
        }),
        (None, Some(_)) => Err(InvalidAnchorError::Incomplete {
            missing: "year",
            present: "month",
        }),
        (Some(year), Some(month)) => Ok(PeriodRequest::Explicit {
            year: parse_int("year", year)?,
            month: parse_int("month", month)?,
        }),
    }
}

fn parse_int(field: &'static str, raw: &str) -> Result<i64, InvalidAnchorError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| InvalidAnchorError::NotNumeric {
            field,
            value: raw.to_string(),
        })
}

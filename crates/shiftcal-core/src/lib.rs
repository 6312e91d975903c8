pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod period;
pub mod render;

use std::ffi::OsString;
use std::io::{
  self,
  IsTerminal
};

use clap::Parser;
use tracing::{
  debug,
  info
};

use crate::clock::{
  Clock,
  FixedClock,
  SystemClock
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting shiftcal"
  );

  let clock: Box<dyn Clock> =
    match cli.today {
      | Some(today) => {
        debug!(%today, "using fixed today");
        Box::new(FixedClock(today))
      }
      | None => Box::new(
        SystemClock::from_env_or(
          cli.timezone.as_deref()
        )
      )
    };

  let color = !cli.no_color
    && io::stdout().is_terminal();
  let session = commands::Session {
    clock:       clock.as_ref(),
    config_path: cli.config.as_deref(),
    renderer:    render::Renderer::new(
      color
    )
  };

  let command =
    cli.command.unwrap_or_default();
  let mut out = io::stdout().lock();
  commands::dispatch(
    &session, command, &mut out
  )?;

  info!("done");
  Ok(())
}

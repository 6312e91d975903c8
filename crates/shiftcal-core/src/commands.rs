use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tracing::{info, instrument, warn};

use crate::cli::{Command, OutputArgs, PeriodArgs};
use crate::clock::Clock;
use crate::config::{ConfigSource, LoadedConfig, load_config};
use crate::period::{Period, compute_period};
use crate::render::{Overview, PeriodResponse, Renderer, write_json};

/// Everything a command needs besides its own arguments.
pub struct Session<'a> {
    pub clock: &'a dyn Clock,
    pub config_path: Option<&'a Path>,
    pub renderer: Renderer,
}

#[instrument(skip(session, out))]
pub fn dispatch<W: Write>(session: &Session<'_>, command: Command, out: &mut W) -> anyhow::Result<()> {
    match command {
        Command::Period(args) => cmd_period(session, &args, out),
        Command::Config(args) => cmd_config(session, &args, out),
        Command::Show(args) => cmd_show(session, &args, out),
    }
}

fn resolve_period(session: &Session<'_>, args: &PeriodArgs) -> anyhow::Result<Period> {
    let request = args.request().context("invalid period query")?;
    let period = compute_period(request, session.clock)
        .with_context(|| format!("cannot build payroll period for {request:?}"))?;
    info!(
        anchor = %period.anchor,
        start = %period.start_date,
        end = %period.end_date,
        "computed payroll period"
    );
    Ok(period)
}

fn resolve_config(session: &Session<'_>) -> LoadedConfig {
    let loaded = load_config(session.config_path);
    if let ConfigSource::Fallback { path, reason } = &loaded.source {
        warn!(file = %path.display(), reason = %reason, "shift config replaced by defaults");
    }
    loaded
}

fn cmd_period<W: Write>(session: &Session<'_>, args: &PeriodArgs, out: &mut W) -> anyhow::Result<()> {
    let period = resolve_period(session, args)?;
    if args.output.json {
        write_json(out, &PeriodResponse::from(&period))
    } else {
        session.renderer.write_period(out, &period, None)
    }
}

fn cmd_config<W: Write>(session: &Session<'_>, args: &OutputArgs, out: &mut W) -> anyhow::Result<()> {
    let loaded = resolve_config(session);
    if args.json {
        write_json(out, &loaded.config)
    } else {
        session.renderer.write_config(out, &loaded.config)
    }
}

fn cmd_show<W: Write>(session: &Session<'_>, args: &PeriodArgs, out: &mut W) -> anyhow::Result<()> {
    let period = resolve_period(session, args)?;
    let loaded = resolve_config(session);

    if args.output.json {
        let overview = Overview {
            period: PeriodResponse::from(&period),
            config: &loaded.config,
        };
        return write_json(out, &overview);
    }

    session.renderer.write_period(&mut *out, &period, Some(&loaded.config))?;
    writeln!(out)?;
    session.renderer.write_config(out, &loaded.config)
}

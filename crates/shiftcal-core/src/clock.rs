use chrono::{
  Local,
  NaiveDate,
  Utc
};
use chrono_tz::Tz;

pub const TIMEZONE_ENV_VAR: &str =
  "SHIFTCAL_TIMEZONE";

/// Source of "today". Everything that
/// depends on the wall clock goes
/// through this.
pub trait Clock {
  fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
  tz: Option<Tz>
}

impl SystemClock {
  pub fn local() -> Self {
    Self { tz: None }
  }

  pub fn in_timezone(tz: Tz) -> Self {
    Self { tz: Some(tz) }
  }

  /// Explicit value first, then
  /// `SHIFTCAL_TIMEZONE`, then the host
  /// local zone.
  #[tracing::instrument]
  pub fn from_env_or(
    override_tz: Option<&str>
  ) -> Self {
    if let Some(raw) = override_tz
      && let Some(tz) =
        parse_timezone(raw, "--timezone")
    {
      return Self::in_timezone(tz);
    }

    if let Ok(raw) =
      std::env::var(TIMEZONE_ENV_VAR)
      && let Some(tz) = parse_timezone(
        &raw,
        TIMEZONE_ENV_VAR
      )
    {
      return Self::in_timezone(tz);
    }

    tracing::debug!(
      "using host local timezone"
    );
    Self::local()
  }

  pub fn timezone(&self) -> Option<Tz> {
    self.tz
  }
}

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate {
    match self.tz {
      | Some(tz) => {
        Utc::now()
          .with_timezone(&tz)
          .date_naive()
      }
      | None => Local::now().date_naive()
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate {
    self.0
  }
}

fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::info!(
        source,
        timezone = %trimmed,
        "configured timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::warn!(
        source,
        timezone = %trimmed,
        error = %err,
        "ignoring unknown timezone id"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    Clock,
    FixedClock,
    SystemClock,
    parse_timezone
  };

  #[test]
  fn fixed_clock_returns_its_date() {
    let date =
      NaiveDate::from_ymd_opt(2025, 6, 10)
        .expect("valid date");
    assert_eq!(FixedClock(date).today(), date);
  }

  #[test]
  fn parses_iana_names() {
    assert_eq!(
      parse_timezone("Asia/Tokyo", "test"),
      Some(chrono_tz::Asia::Tokyo)
    );
    assert_eq!(
      parse_timezone(" UTC ", "test"),
      Some(chrono_tz::UTC)
    );
  }

  #[test]
  fn rejects_unknown_or_empty_names() {
    assert_eq!(
      parse_timezone("Mars/Olympus", "test"),
      None
    );
    assert_eq!(
      parse_timezone("   ", "test"),
      None
    );
  }

  #[test]
  fn explicit_timezone_wins() {
    let clock = SystemClock::from_env_or(
      Some("Asia/Tokyo")
    );
    assert_eq!(
      clock.timezone(),
      Some(chrono_tz::Asia::Tokyo)
    );
  }
}

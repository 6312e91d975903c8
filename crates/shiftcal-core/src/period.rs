use std::fmt;

use chrono::{
  Datelike,
  NaiveDate
};
use tracing::debug;

use crate::clock::Clock;

pub const MIN_YEAR: i64 = 1;
pub const MAX_YEAR: i64 = 9999;

/// Last day of the anchor month that still
/// belongs to the period ending in it.
pub const CLOSING_DAY: u32 = 15;

/// Japanese weekday labels, indexed
/// Monday=0 through Sunday=6.
pub const WEEKDAY_JP: [&str; 7] =
  ["月", "火", "水", "木", "金", "土", "日"];

const WEEKDAY_ABBREV: [&str; 7] = [
  "Mon", "Tue", "Wed", "Thu", "Fri",
  "Sat", "Sun"
];

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  thiserror::Error
)]
pub enum InvalidAnchorError {
  #[error(
    "month {month} is outside 1-12"
  )]
  MonthOutOfRange { month: i64 },

  #[error(
    "year {year} is outside 1-9999"
  )]
  YearOutOfRange { year: i64 },

  #[error(
    "{field} must be an integer, got \
     `{value}`"
  )]
  NotNumeric {
    field: &'static str,
    value: String
  },

  #[error(
    "{missing} is required when \
     {present} is given"
  )]
  Incomplete {
    missing: &'static str,
    present: &'static str
  }
}

/// Identifies a payroll period by the
/// month whose 15th closes it.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash
)]
pub struct Anchor {
  year:  i32,
  month: u32
}

impl Anchor {
  pub fn new(
    year: i64,
    month: i64
  ) -> Result<Self, InvalidAnchorError> {
    if !(1..=12).contains(&month) {
      return Err(
        InvalidAnchorError::MonthOutOfRange {
          month
        }
      );
    }
    if !(MIN_YEAR..=MAX_YEAR)
      .contains(&year)
    {
      return Err(
        InvalidAnchorError::YearOutOfRange {
          year
        }
      );
    }

    Ok(Self {
      year:  year as i32,
      month: month as u32
    })
  }

  /// The anchor whose period contains
  /// `today`: the current month up to the
  /// 15th, the following month after it.
  #[must_use]
  pub fn from_today(
    today: NaiveDate
  ) -> Self {
    let current = Self {
      year:  today.year(),
      month: today.month()
    };
    if today.day() <= CLOSING_DAY {
      current
    } else {
      current.next_raw()
    }
  }

  pub fn year(self) -> i32 {
    self.year
  }

  pub fn month(self) -> u32 {
    self.month
  }

  /// The anchor one month earlier, or
  /// `None` before 0001-01.
  pub fn previous(self) -> Option<Self> {
    self.previous_raw().checked()
  }

  /// The anchor one month later, or `None`
  /// after 9999-12.
  pub fn next(self) -> Option<Self> {
    self.next_raw().checked()
  }

  fn previous_raw(self) -> Self {
    if self.month == 1 {
      Self {
        year:  self.year - 1,
        month: 12
      }
    } else {
      Self {
        year:  self.year,
        month: self.month - 1
      }
    }
  }

  fn next_raw(self) -> Self {
    if self.month == 12 {
      Self {
        year:  self.year + 1,
        month: 1
      }
    } else {
      Self {
        year:  self.year,
        month: self.month + 1
      }
    }
  }

  fn checked(self) -> Option<Self> {
    Self::new(
      i64::from(self.year),
      i64::from(self.month)
    )
    .ok()
  }

  pub fn days_in_month(self) -> u32 {
    days_in_month(self.year, self.month)
  }

  fn day(
    self,
    day: u32
  ) -> Result<NaiveDate, InvalidAnchorError>
  {
    NaiveDate::from_ymd_opt(
      self.year, self.month, day
    )
    .ok_or(
      InvalidAnchorError::YearOutOfRange {
        year: i64::from(self.year)
      }
    )
  }
}

impl fmt::Display for Anchor {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{:04}-{:02}",
      self.year, self.month
    )
  }
}

pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  match month {
    | 2 if is_leap_year(year) => 29,
    | 2 => 28,
    | 4 | 6 | 9 | 11 => 30,
    | _ => 31
  }
}

fn is_leap_year(year: i32) -> bool {
  (year % 4 == 0 && year % 100 != 0)
    || year % 400 == 0
}

pub fn weekday_jp(
  index: usize
) -> Option<&'static str> {
  WEEKDAY_JP.get(index).copied()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDate {
  pub date:              NaiveDate,
  pub iso_date:          String,
  pub day_of_month:      u32,
  pub weekday_abbrev:    &'static str,
  pub weekday_localized: &'static str
}

impl CalendarDate {
  pub fn new(date: NaiveDate) -> Self {
    let idx = date
      .weekday()
      .num_days_from_monday()
      as usize;
    Self {
      date,
      iso_date: date
        .format("%Y-%m-%d")
        .to_string(),
      day_of_month: date.day(),
      weekday_abbrev: WEEKDAY_ABBREV[idx],
      weekday_localized: WEEKDAY_JP[idx]
    }
  }

  pub fn weekday_index(&self) -> usize {
    self
      .date
      .weekday()
      .num_days_from_monday()
      as usize
  }

  pub fn is_weekend(&self) -> bool {
    self.weekday_index() >= 5
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
  pub start_date:      NaiveDate,
  pub end_date:        NaiveDate,
  pub anchor:          Anchor,
  pub previous_anchor: Option<Anchor>,
  pub next_anchor:     Option<Anchor>,
  pub dates:           Vec<CalendarDate>
}

impl Period {
  /// Builds the period running from the
  /// 16th of the month before `anchor`
  /// through the 15th of `anchor`.
  pub fn for_anchor(
    anchor: Anchor
  ) -> Result<Self, InvalidAnchorError> {
    let previous_anchor =
      anchor.previous();
    let next_anchor = anchor.next();

    let start_date = anchor
      .previous_raw()
      .day(CLOSING_DAY + 1)?;
    let end_date =
      anchor.day(CLOSING_DAY)?;

    let dates: Vec<CalendarDate> =
      start_date
        .iter_days()
        .take_while(|d| *d <= end_date)
        .map(CalendarDate::new)
        .collect();

    debug!(
      %anchor,
      start = %start_date,
      end = %end_date,
      days = dates.len(),
      "built payroll period"
    );

    Ok(Self {
      start_date,
      end_date,
      anchor,
      previous_anchor,
      next_anchor,
      dates
    })
  }

  pub fn len(&self) -> usize {
    self.dates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dates.is_empty()
  }

  pub fn contains(
    &self,
    date: NaiveDate
  ) -> bool {
    date >= self.start_date
      && date <= self.end_date
  }

  pub fn date(
    &self,
    date: NaiveDate
  ) -> Option<&CalendarDate> {
    if !self.contains(date) {
      return None;
    }
    let offset =
      (date - self.start_date).num_days();
    self.dates.get(offset as usize)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodRequest {
  Explicit { year: i64, month: i64 },
  Today
}

#[tracing::instrument(skip(clock))]
pub fn compute_period(
  request: PeriodRequest,
  clock: &dyn Clock
) -> Result<Period, InvalidAnchorError> {
  let anchor = match request {
    | PeriodRequest::Explicit {
      year,
      month
    } => Anchor::new(year, month)?,
    | PeriodRequest::Today => {
      let today = clock.today();
      let derived =
        Anchor::from_today(today);
      let anchor = Anchor::new(
        i64::from(derived.year),
        i64::from(derived.month)
      )?;
      debug!(
        %today,
        %anchor,
        "resolved anchor from today"
      );
      anchor
    }
  };

  Period::for_anchor(anchor)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    Anchor,
    CalendarDate,
    InvalidAnchorError,
    Period,
    PeriodRequest,
    WEEKDAY_JP,
    compute_period,
    days_in_month,
    weekday_jp
  };
  use crate::clock::FixedClock;

  fn ymd(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  fn anchor(
    y: i64,
    m: i64
  ) -> Anchor {
    Anchor::new(y, m).expect("anchor")
  }

  #[test]
  fn leap_february_window() {
    let period =
      Period::for_anchor(anchor(2024, 3))
        .expect("period");
    assert_eq!(
      period.start_date,
      ymd(2024, 2, 16)
    );
    assert_eq!(
      period.end_date,
      ymd(2024, 3, 15)
    );
    assert_eq!(period.len(), 29);
    assert_eq!(
      period.previous_anchor,
      Some(anchor(2024, 2))
    );
    assert_eq!(
      period.next_anchor,
      Some(anchor(2024, 4))
    );
  }

  #[test]
  fn january_rolls_back_a_year() {
    let period =
      Period::for_anchor(anchor(2024, 1))
        .expect("period");
    assert_eq!(
      period.start_date,
      ymd(2023, 12, 16)
    );
    assert_eq!(
      period.end_date,
      ymd(2024, 1, 15)
    );
    assert_eq!(
      period.previous_anchor,
      Some(anchor(2023, 12))
    );
    assert_eq!(
      period.next_anchor,
      Some(anchor(2024, 2))
    );
  }

  #[test]
  fn december_rolls_forward_a_year() {
    let period = Period::for_anchor(
      anchor(2024, 12)
    )
    .expect("period");
    assert_eq!(
      period.start_date,
      ymd(2024, 11, 16)
    );
    assert_eq!(
      period.end_date,
      ymd(2024, 12, 15)
    );
    assert_eq!(
      period.next_anchor,
      Some(anchor(2025, 1))
    );
  }

  #[test]
  fn neighbours_stop_at_year_range() {
    let first =
      Period::for_anchor(anchor(1, 1))
        .expect("period");
    assert_eq!(first.previous_anchor, None);
    assert_eq!(
      first.next_anchor,
      Some(anchor(1, 2))
    );
    assert_eq!(
      first.start_date,
      ymd(0, 12, 16)
    );

    let last = Period::for_anchor(
      anchor(9999, 12)
    )
    .expect("period");
    assert_eq!(last.next_anchor, None);
    assert_eq!(
      last.previous_anchor,
      Some(anchor(9999, 11))
    );
  }

  #[test]
  fn today_past_last_period_is_rejected() {
    let clock =
      FixedClock(ymd(9999, 12, 20));
    assert_eq!(
      compute_period(
        PeriodRequest::Today,
        &clock
      ),
      Err(
        InvalidAnchorError::YearOutOfRange {
          year: 10000
        }
      )
    );
  }

  #[test]
  fn dates_are_contiguous() {
    let period =
      Period::for_anchor(anchor(2023, 5))
        .expect("period");
    assert_eq!(
      period.dates.first().map(|d| d.date),
      Some(period.start_date)
    );
    assert_eq!(
      period.dates.last().map(|d| d.date),
      Some(period.end_date)
    );
    for pair in period.dates.windows(2) {
      assert_eq!(
        pair[0].date.succ_opt(),
        Some(pair[1].date)
      );
    }
  }

  #[test]
  fn today_on_or_before_15th_keeps_month()
  {
    assert_eq!(
      Anchor::from_today(ymd(2025, 6, 10)),
      anchor(2025, 6)
    );
    assert_eq!(
      Anchor::from_today(ymd(2025, 6, 15)),
      anchor(2025, 6)
    );
  }

  #[test]
  fn today_after_15th_moves_to_next_month()
  {
    assert_eq!(
      Anchor::from_today(ymd(2025, 6, 16)),
      anchor(2025, 7)
    );
    assert_eq!(
      Anchor::from_today(ymd(
        2025, 12, 20
      )),
      anchor(2026, 1)
    );
  }

  #[test]
  fn today_request_uses_clock() {
    let clock =
      FixedClock(ymd(2025, 6, 20));
    let period = compute_period(
      PeriodRequest::Today,
      &clock
    )
    .expect("period");
    assert_eq!(
      period.anchor,
      anchor(2025, 7)
    );
    assert_eq!(
      period.start_date,
      ymd(2025, 6, 16)
    );
  }

  #[test]
  fn rejects_month_13() {
    let clock =
      FixedClock(ymd(2025, 1, 1));
    let err = compute_period(
      PeriodRequest::Explicit {
        year:  2024,
        month: 13
      },
      &clock
    )
    .expect_err("month 13");
    assert_eq!(
      err,
      InvalidAnchorError::MonthOutOfRange {
        month: 13
      }
    );
  }

  #[test]
  fn rejects_non_positive_year() {
    assert_eq!(
      Anchor::new(0, 5),
      Err(
        InvalidAnchorError::YearOutOfRange {
          year: 0
        }
      )
    );
  }

  #[test]
  fn monday_maps_to_first_label() {
    let monday = CalendarDate::new(ymd(
      2024, 2, 19
    ));
    assert_eq!(monday.weekday_index(), 0);
    assert_eq!(monday.weekday_abbrev, "Mon");
    assert_eq!(
      monday.weekday_localized,
      WEEKDAY_JP[0]
    );

    let sunday = CalendarDate::new(ymd(
      2024, 3, 10
    ));
    assert_eq!(sunday.weekday_localized, "日");
    assert!(sunday.is_weekend());
    assert_eq!(weekday_jp(6), Some("日"));
    assert_eq!(weekday_jp(7), None);
  }

  #[test]
  fn month_lengths() {
    assert_eq!(days_in_month(2023, 2), 28);
    assert_eq!(days_in_month(2024, 2), 29);
    assert_eq!(days_in_month(1900, 2), 28);
    assert_eq!(days_in_month(2000, 2), 29);
    assert_eq!(days_in_month(2024, 4), 30);
    assert_eq!(days_in_month(2024, 12), 31);
  }

  #[test]
  fn lookup_inside_and_outside() {
    let period =
      Period::for_anchor(anchor(2024, 3))
        .expect("period");
    let found = period
      .date(ymd(2024, 3, 1))
      .expect("inside period");
    assert_eq!(found.iso_date, "2024-03-01");
    assert_eq!(found.weekday_localized, "金");
    assert!(
      period.date(ymd(2024, 3, 16)).is_none()
    );
    assert!(
      !period.contains(ymd(2024, 2, 15))
    );
  }
}

use std::io::Write;

use serde::Serialize;
use unicode_width::UnicodeWidthChar;

use crate::config::{Leaf, ShiftConfig, StaffCounts};
use crate::period::{Anchor, CalendarDate, Period};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateEntry {
    pub date: String,
    pub day: u32,
    pub weekday: &'static str,
    pub weekday_jp: &'static str,
}

impl From<&CalendarDate> for DateEntry {
    fn from(date: &CalendarDate) -> Self {
        Self {
            date: date.iso_date.clone(),
            day: date.day_of_month,
            weekday: date.weekday_abbrev,
            weekday_jp: date.weekday_localized,
        }
    }
}

/// Wire shape of a payroll period. The neighbour fields are `null` at the
/// ends of the supported year range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodResponse {
    pub start_date: String,
    pub end_date: String,
    pub display_month: u32,
    pub display_year: i32,
    pub prev_year: Option<i32>,
    pub prev_month: Option<u32>,
    pub next_year: Option<i32>,
    pub next_month: Option<u32>,
    pub dates: Vec<DateEntry>,
}

impl From<&Period> for PeriodResponse {
    fn from(period: &Period) -> Self {
        Self {
            start_date: period.start_date.format("%Y-%m-%d").to_string(),
            end_date: period.end_date.format("%Y-%m-%d").to_string(),
            display_month: period.anchor.month(),
            display_year: period.anchor.year(),
            prev_year: period.previous_anchor.map(Anchor::year),
            prev_month: period.previous_anchor.map(Anchor::month),
            next_year: period.next_anchor.map(Anchor::year),
            next_month: period.next_anchor.map(Anchor::month),
            dates: period.dates.iter().map(DateEntry::from).collect(),
        }
    }
}

/// Period and shift config side by side.
#[derive(Debug, Clone, Serialize)]
pub struct Overview<'a> {
    pub period: PeriodResponse,
    pub config: &'a ShiftConfig,
}

pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Prints the period header and one row per date. With a config, the
    /// staffing need for each day is added as two extra columns.
    #[tracing::instrument(skip(self, writer, period, config))]
    pub fn write_period<W: Write>(
        &self,
        mut writer: W,
        period: &Period,
        config: Option<&ShiftConfig>,
    ) -> anyhow::Result<()> {
        writeln!(
            writer,
            "{}年{}月度 ({} 〜 {})",
            period.anchor.year(),
            period.anchor.month(),
            period.start_date.format("%Y-%m-%d"),
            period.end_date.format("%Y-%m-%d"),
        )?;
        writeln!(
            writer,
            "前月 {}  翌月 {}  ({} days)",
            show(period.previous_anchor),
            show(period.next_anchor),
            period.len(),
        )?;
        writeln!(writer)?;

        let mut headers = vec![
            "Date".to_string(),
            "Day".to_string(),
            "Weekday".to_string(),
            "曜日".to_string(),
        ];
        if config.is_some() {
            headers.push("日勤".to_string());
            headers.push("夜勤".to_string());
        }

        let mut rows = Vec::with_capacity(period.len());
        for date in &period.dates {
            let code = match date.weekday_index() {
                5 => Some("34"),
                6 => Some("31"),
                _ => None,
            };
            let weekday_jp = match code {
                Some(code) => self.paint(date.weekday_localized, code),
                None => date.weekday_localized.to_string(),
            };

            let mut row = vec![
                date.iso_date.clone(),
                date.day_of_month.to_string(),
                date.weekday_abbrev.to_string(),
                weekday_jp,
            ];
            if let Some(cfg) = config {
                let need = cfg.daily_requirement(date);
                row.push(need.day_shift.to_string());
                row.push(need.night_shift.to_string());
            }
            rows.push(row);
        }

        write_table(&mut writer, headers, rows)
    }

    #[tracing::instrument(skip_all)]
    pub fn write_config<W: Write>(&self, mut writer: W, config: &ShiftConfig) -> anyhow::Result<()> {
        let staff = config.staff_list();
        let staff_line = if staff.is_empty() {
            format!("(none), day-shift only {}", config.day_shift_only_count())
        } else {
            format!(
                "{}, day-shift only {}",
                staff.join(" "),
                config.day_shift_only_staff().join(" ")
            )
        };

        let hours = config
            .shift_hour_entries()
            .map(|(label, hours)| format!("{label}={}", show(hours)))
            .collect::<Vec<_>>()
            .join(" ");

        let required = config.required_staff.as_ref().and_then(Leaf::typed);
        let required_line = format!(
            "weekday {} / weekend {}",
            format_counts(required.and_then(|r| r.weekday.as_ref())),
            format_counts(required.and_then(|r| r.weekend.as_ref())),
        );

        let penalties_line = format!(
            "continuousShift={} hoursDifferenceMultiplier={} samePairPenalty={} requiredStaffPenalty={}",
            config.continuous_shift_penalty(),
            config.hours_difference_multiplier(),
            config.same_pair_penalty(),
            config.required_staff_penalty(),
        );

        let constraints_line = format!(
            "maxConsecutive24Shifts={} preventSamePair={} targetHoursMax={} relaxedHoursMax={}",
            config.max_consecutive_24_shifts(),
            config.prevent_same_pair(),
            config.target_hours_max(),
            config.relaxed_hours_max(),
        );

        let types_line = format!(
            "24h={} day={} morning={} rest={} paidLeave={}",
            config.hour_24_shifts().join(","),
            config.day_shift_label(),
            config.morning_shift_label(),
            config.rest_label(),
            config.paid_leave_label(),
        );

        let headers = vec!["Section".to_string(), "Value".to_string()];
        let mut rows = vec![
            vec![self.paint("staff", "33"), staff_line],
            vec![self.paint("shiftHours", "33"), hours],
            vec![self.paint("requiredStaff", "33"), required_line],
            vec![self.paint("penalties", "33"), penalties_line],
            vec![self.paint("constraints", "33"), constraints_line],
            vec![self.paint("shiftTypes", "33"), types_line],
        ];
        for (key, value) in &config.extra {
            rows.push(vec![key.clone(), value.to_string()]);
        }

        write_table(&mut writer, headers, rows)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn show<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// A counts object that is not an object is printed as written.
fn format_counts(counts: Option<&Leaf<StaffCounts>>) -> String {
    match counts {
        Some(Leaf::Raw(value)) => value.to_string(),
        Some(Leaf::Typed(counts)) => format!(
            "day={} night={}",
            show(counts.day_shift()),
            show(counts.night_shift()),
        ),
        None => "day=- night=-".to_string(),
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(visible_width(header));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(visible_width(cell));
        }
    }

    let pad = |text: &str, width: usize| {
        format!("{}{}", text, " ".repeat(width.saturating_sub(visible_width(text))))
    };

    let line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(header, *width))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{}", line.trim_end())?;

    let rule = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{rule}")?;

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line.trim_end())?;
    }

    Ok(())
}

/// Terminal columns taken by `text`, not counting SGR escape sequences.
fn visible_width(text: &str) -> usize {
    let mut chars = text.chars();
    let mut width = 0;
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            chars.by_ref().find(|c| c.is_ascii_alphabetic());
            continue;
        }
        width += ch.width().unwrap_or(0);
    }
    width
}

use std::collections::BTreeMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use serde::{
  Deserialize,
  Serialize
};
use serde_json::Value;
use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::period::CalendarDate;

pub const CONFIG_ENV_VAR: &str =
  "SHIFTCAL_CONFIG";
pub const CONFIG_FILE_NAME: &str =
  "config.json";

const DEFAULT_HOUR_24_SHIFTS: [&str; 3] =
  ["24A", "24B", "夜勤"];
const DEFAULT_DAY_SHIFT: &str = "日勤";
const DEFAULT_MORNING_SHIFT: &str = "明";
const DEFAULT_REST: &str = "休";
const DEFAULT_PAID_LEAVE: &str = "有休";

/// A value exactly as the user wrote it.
/// Anything that does not fit the expected
/// type is kept verbatim instead of
/// rejecting the file.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize
)]
#[serde(untagged)]
pub enum Leaf<T> {
  Typed(T),
  Raw(Value)
}

impl<T> Leaf<T> {
  pub fn typed(&self) -> Option<&T> {
    match self {
      | Leaf::Typed(value) => Some(value),
      | Leaf::Raw(_) => None
    }
  }

  pub fn raw(&self) -> Option<&Value> {
    match self {
      | Leaf::Typed(_) => None,
      | Leaf::Raw(value) => Some(value)
    }
  }
}

impl Leaf<f64> {
  /// Numeric strings count as numbers.
  pub fn as_number(&self) -> Option<f64> {
    match self {
      | Leaf::Typed(value) => Some(*value),
      | Leaf::Raw(Value::String(s)) => {
        s.trim()
          .parse::<f64>()
          .ok()
          .filter(|v| v.is_finite())
      }
      | Leaf::Raw(_) => None
    }
  }
}

impl Leaf<u32> {
  /// Fractions are truncated, numeric
  /// strings parsed; negatives yield none.
  pub fn as_count(&self) -> Option<u32> {
    match self {
      | Leaf::Typed(value) => Some(*value),
      | Leaf::Raw(Value::Number(n)) => {
        n.as_f64().and_then(count_from_f64)
      }
      | Leaf::Raw(Value::String(s)) => s
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(count_from_f64),
      | Leaf::Raw(_) => None
    }
  }
}

fn count_from_f64(value: f64) -> Option<u32> {
  if value.is_finite()
    && value >= 0.0
    && value <= f64::from(u32::MAX)
  {
    Some(value.trunc() as u32)
  } else {
    None
  }
}

fn typed<T>(value: T) -> Option<Leaf<T>> {
  Some(Leaf::Typed(value))
}

/// Shift rules handed to the presentation
/// layer next to the period. Every section
/// is optional on input; unknown keys are
/// carried through untouched.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "camelCase")]
pub struct ShiftConfig {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub staff: Option<Leaf<StaffSection>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub shift_hours:
    Option<Leaf<BTreeMap<String, Leaf<f64>>>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub required_staff:
    Option<Leaf<RequiredStaffSection>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub penalties:
    Option<Leaf<PenaltiesSection>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub constraints:
    Option<Leaf<ConstraintsSection>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub shift_types:
    Option<Leaf<ShiftTypesSection>>,

  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "camelCase")]
pub struct StaffSection {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub list: Option<Leaf<Vec<String>>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub day_shift_only_count:
    Option<Leaf<u32>>,

  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize
)]
pub struct RequiredStaffSection {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub weekday: Option<Leaf<StaffCounts>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub weekend: Option<Leaf<StaffCounts>>,

  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "camelCase")]
pub struct StaffCounts {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub day_shift: Option<Leaf<u32>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub night_shift: Option<Leaf<u32>>,

  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>
}

impl StaffCounts {
  pub fn day_shift(&self) -> Option<u32> {
    self
      .day_shift
      .as_ref()
      .and_then(Leaf::as_count)
  }

  pub fn night_shift(&self) -> Option<u32> {
    self
      .night_shift
      .as_ref()
      .and_then(Leaf::as_count)
  }
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "camelCase")]
pub struct PenaltiesSection {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub continuous_shift: Option<Leaf<f64>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub hours_difference_multiplier:
    Option<Leaf<f64>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub same_pair_penalty: Option<Leaf<f64>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub required_staff_penalty:
    Option<Leaf<f64>>,

  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintsSection {
  #[serde(
    default,
    rename = "maxConsecutive24Shifts",
    skip_serializing_if = "Option::is_none"
  )]
  pub max_consecutive_24_shifts:
    Option<Leaf<u32>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub prevent_same_pair: Option<Leaf<bool>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub target_hours_max: Option<Leaf<f64>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub relaxed_hours_max: Option<Leaf<f64>>,

  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTypesSection {
  #[serde(
    default,
    rename = "24HourShifts",
    skip_serializing_if = "Option::is_none"
  )]
  pub hour_24_shifts:
    Option<Leaf<Vec<String>>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub day_shift: Option<Leaf<String>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub morning_shift: Option<Leaf<String>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub rest: Option<Leaf<String>>,

  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub paid_leave: Option<Leaf<String>>,

  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>
}

/// Staff needed on one calendar day.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize
)]
#[serde(rename_all = "camelCase")]
pub struct DailyRequirement {
  pub day_shift:   u32,
  pub night_shift: u32
}

impl ShiftConfig {
  pub fn defaults() -> Self {
    let shift_hours = [
      ("日勤", 8.0),
      ("24A", 16.0),
      ("24B", 16.0),
      ("夜勤", 16.0),
      ("有休", 8.0),
      ("明", 0.0),
      ("休", 0.0)
    ]
    .into_iter()
    .map(|(k, v)| {
      (k.to_string(), Leaf::Typed(v))
    })
    .collect();

    Self {
      staff: typed(StaffSection {
        list: typed(vec![]),
        day_shift_only_count: typed(3),
        extra: BTreeMap::new()
      }),
      shift_hours: typed(shift_hours),
      required_staff: typed(
        RequiredStaffSection {
          weekday: typed(StaffCounts {
            day_shift:   typed(3),
            night_shift: typed(3),
            extra:       BTreeMap::new()
          }),
          weekend: typed(StaffCounts {
            day_shift:   None,
            night_shift: typed(3),
            extra:       BTreeMap::new()
          }),
          extra:   BTreeMap::new()
        }
      ),
      penalties: typed(PenaltiesSection {
        continuous_shift: typed(1000.0),
        hours_difference_multiplier: typed(
          100.0
        ),
        same_pair_penalty: typed(100_000.0),
        required_staff_penalty: None,
        extra: BTreeMap::new()
      }),
      constraints: typed(
        ConstraintsSection {
          max_consecutive_24_shifts: typed(
            2
          ),
          prevent_same_pair: typed(true),
          target_hours_max: None,
          relaxed_hours_max: None,
          extra: BTreeMap::new()
        }
      ),
      shift_types: typed(ShiftTypesSection {
        hour_24_shifts: typed(
          DEFAULT_HOUR_24_SHIFTS
            .iter()
            .map(|s| s.to_string())
            .collect()
        ),
        day_shift: typed(
          DEFAULT_DAY_SHIFT.to_string()
        ),
        morning_shift: typed(
          DEFAULT_MORNING_SHIFT.to_string()
        ),
        rest: typed(DEFAULT_REST.to_string()),
        paid_leave: typed(
          DEFAULT_PAID_LEAVE.to_string()
        ),
        extra: BTreeMap::new()
      }),
      extra: BTreeMap::new()
    }
  }

  /// Overlays `self` on the built-in
  /// defaults. Missing sections are taken
  /// whole; present sections only gain the
  /// keys they lack. Nothing below the
  /// second level is merged, and a section
  /// that is not an object is left as is.
  #[must_use]
  pub fn merged_over_defaults(
    self
  ) -> Self {
    self.merged_over(Self::defaults())
  }

  #[must_use]
  pub fn merged_over(
    mut self,
    defaults: Self
  ) -> Self {
    merge_section(
      &mut self.staff,
      defaults.staff,
      StaffSection::fill_from
    );
    merge_section(
      &mut self.shift_hours,
      defaults.shift_hours,
      fill_map
    );
    merge_section(
      &mut self.required_staff,
      defaults.required_staff,
      RequiredStaffSection::fill_from
    );
    merge_section(
      &mut self.penalties,
      defaults.penalties,
      PenaltiesSection::fill_from
    );
    merge_section(
      &mut self.constraints,
      defaults.constraints,
      ConstraintsSection::fill_from
    );
    merge_section(
      &mut self.shift_types,
      defaults.shift_types,
      ShiftTypesSection::fill_from
    );
    for (key, value) in defaults.extra {
      self.extra.entry(key).or_insert(value);
    }
    self
  }

  fn staff_section(
    &self
  ) -> Option<&StaffSection> {
    self.staff.as_ref().and_then(Leaf::typed)
  }

  fn penalties_section(
    &self
  ) -> Option<&PenaltiesSection> {
    self
      .penalties
      .as_ref()
      .and_then(Leaf::typed)
  }

  fn constraints_section(
    &self
  ) -> Option<&ConstraintsSection> {
    self
      .constraints
      .as_ref()
      .and_then(Leaf::typed)
  }

  fn shift_types_section(
    &self
  ) -> Option<&ShiftTypesSection> {
    self
      .shift_types
      .as_ref()
      .and_then(Leaf::typed)
  }

  fn shift_label(
    &self,
    pick: impl Fn(
      &ShiftTypesSection
    ) -> Option<&Leaf<String>>
  ) -> Option<&str> {
    self
      .shift_types_section()
      .and_then(pick)
      .and_then(Leaf::typed)
      .map(String::as_str)
  }

  fn penalty(
    &self,
    pick: impl Fn(
      &PenaltiesSection
    ) -> Option<&Leaf<f64>>
  ) -> Option<f64> {
    self
      .penalties_section()
      .and_then(pick)
      .and_then(Leaf::as_number)
  }

  pub fn staff_list(&self) -> &[String] {
    self
      .staff_section()
      .and_then(|s| s.list.as_ref())
      .and_then(Leaf::typed)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub fn day_shift_only_count(
    &self
  ) -> u32 {
    self
      .staff_section()
      .and_then(|s| {
        s.day_shift_only_count.as_ref()
      })
      .and_then(Leaf::as_count)
      .unwrap_or(3)
  }

  /// The first `dayShiftOnlyCount` names
  /// of the staff list.
  pub fn day_shift_only_staff(
    &self
  ) -> &[String] {
    let list = self.staff_list();
    let count = (self.day_shift_only_count()
      as usize)
      .min(list.len());
    &list[..count]
  }

  pub fn shift_hours(
    &self,
    label: &str
  ) -> Option<f64> {
    self
      .shift_hours
      .as_ref()
      .and_then(Leaf::typed)
      .and_then(|hours| hours.get(label))
      .and_then(Leaf::as_number)
  }

  /// Every configured label with its hours;
  /// `None` where the value is not a number.
  pub fn shift_hour_entries(
    &self
  ) -> impl Iterator<Item = (&str, Option<f64>)>
  {
    self
      .shift_hours
      .as_ref()
      .and_then(Leaf::typed)
      .into_iter()
      .flatten()
      .map(|(label, hours)| {
        (label.as_str(), hours.as_number())
      })
  }

  pub fn hour_24_shifts(
    &self
  ) -> Vec<String> {
    self
      .shift_types_section()
      .and_then(|t| t.hour_24_shifts.as_ref())
      .and_then(Leaf::typed)
      .cloned()
      .unwrap_or_else(|| {
        DEFAULT_HOUR_24_SHIFTS
          .iter()
          .map(|s| s.to_string())
          .collect()
      })
  }

  pub fn day_shift_label(&self) -> &str {
    self
      .shift_label(|t| t.day_shift.as_ref())
      .unwrap_or(DEFAULT_DAY_SHIFT)
  }

  pub fn morning_shift_label(&self) -> &str {
    self
      .shift_label(|t| {
        t.morning_shift.as_ref()
      })
      .unwrap_or(DEFAULT_MORNING_SHIFT)
  }

  pub fn rest_label(&self) -> &str {
    self
      .shift_label(|t| t.rest.as_ref())
      .unwrap_or(DEFAULT_REST)
  }

  pub fn paid_leave_label(&self) -> &str {
    self
      .shift_label(|t| t.paid_leave.as_ref())
      .unwrap_or(DEFAULT_PAID_LEAVE)
  }

  pub fn is_24_hour_shift(
    &self,
    label: &str
  ) -> bool {
    self
      .hour_24_shifts()
      .iter()
      .any(|s| s == label)
  }

  pub fn same_pair_penalty(&self) -> f64 {
    self
      .penalty(|p| p.same_pair_penalty.as_ref())
      .unwrap_or(100_000.0)
  }

  pub fn hours_difference_multiplier(
    &self
  ) -> f64 {
    self
      .penalty(|p| {
        p.hours_difference_multiplier.as_ref()
      })
      .unwrap_or(100.0)
  }

  pub fn continuous_shift_penalty(
    &self
  ) -> f64 {
    self
      .penalty(|p| p.continuous_shift.as_ref())
      .unwrap_or(1000.0)
  }

  pub fn required_staff_penalty(
    &self
  ) -> f64 {
    self
      .penalty(|p| {
        p.required_staff_penalty.as_ref()
      })
      .unwrap_or(1_000_000.0)
  }

  pub fn max_consecutive_24_shifts(
    &self
  ) -> u32 {
    self
      .constraints_section()
      .and_then(|c| {
        c.max_consecutive_24_shifts.as_ref()
      })
      .and_then(Leaf::as_count)
      .unwrap_or(2)
  }

  pub fn prevent_same_pair(&self) -> bool {
    self
      .constraints_section()
      .and_then(|c| {
        c.prevent_same_pair.as_ref()
      })
      .and_then(Leaf::typed)
      .copied()
      .unwrap_or(true)
  }

  /// Upper bound of monthly hours a
  /// schedule aims for.
  pub fn target_hours_max(&self) -> f64 {
    self
      .constraints_section()
      .and_then(|c| c.target_hours_max.as_ref())
      .and_then(Leaf::as_number)
      .unwrap_or(176.0)
  }

  pub fn relaxed_hours_max(&self) -> f64 {
    self
      .constraints_section()
      .and_then(|c| {
        c.relaxed_hours_max.as_ref()
      })
      .and_then(Leaf::as_number)
      .unwrap_or(200.0)
  }

  /// Weekends need no day shift; a missing
  /// or zero count falls back to 3.
  pub fn daily_requirement(
    &self,
    date: &CalendarDate
  ) -> DailyRequirement {
    let required = self
      .required_staff
      .as_ref()
      .and_then(Leaf::typed);
    let weekday = required
      .and_then(|r| r.weekday.as_ref())
      .and_then(Leaf::typed);
    let weekend = required
      .and_then(|r| r.weekend.as_ref())
      .and_then(Leaf::typed);

    let count_or_default =
      |value: Option<u32>| {
        value.filter(|v| *v > 0).unwrap_or(3)
      };

    if date.is_weekend() {
      DailyRequirement {
        day_shift:   0,
        night_shift: count_or_default(
          weekend
            .and_then(StaffCounts::night_shift)
        )
      }
    } else {
      DailyRequirement {
        day_shift:   count_or_default(
          weekday
            .and_then(StaffCounts::day_shift)
        ),
        night_shift: count_or_default(
          weekday
            .and_then(StaffCounts::night_shift)
        )
      }
    }
  }
}

impl StaffSection {
  fn fill_from(&mut self, defaults: Self) {
    fill(&mut self.list, defaults.list);
    fill(
      &mut self.day_shift_only_count,
      defaults.day_shift_only_count
    );
    fill_map(&mut self.extra, defaults.extra);
  }
}

impl RequiredStaffSection {
  fn fill_from(&mut self, defaults: Self) {
    fill(
      &mut self.weekday,
      defaults.weekday
    );
    fill(
      &mut self.weekend,
      defaults.weekend
    );
    fill_map(&mut self.extra, defaults.extra);
  }
}

impl PenaltiesSection {
  fn fill_from(&mut self, defaults: Self) {
    fill(
      &mut self.continuous_shift,
      defaults.continuous_shift
    );
    fill(
      &mut self.hours_difference_multiplier,
      defaults.hours_difference_multiplier
    );
    fill(
      &mut self.same_pair_penalty,
      defaults.same_pair_penalty
    );
    fill(
      &mut self.required_staff_penalty,
      defaults.required_staff_penalty
    );
    fill_map(&mut self.extra, defaults.extra);
  }
}

impl ConstraintsSection {
  fn fill_from(&mut self, defaults: Self) {
    fill(
      &mut self.max_consecutive_24_shifts,
      defaults.max_consecutive_24_shifts
    );
    fill(
      &mut self.prevent_same_pair,
      defaults.prevent_same_pair
    );
    fill(
      &mut self.target_hours_max,
      defaults.target_hours_max
    );
    fill(
      &mut self.relaxed_hours_max,
      defaults.relaxed_hours_max
    );
    fill_map(&mut self.extra, defaults.extra);
  }
}

impl ShiftTypesSection {
  fn fill_from(&mut self, defaults: Self) {
    fill(
      &mut self.hour_24_shifts,
      defaults.hour_24_shifts
    );
    fill(
      &mut self.day_shift,
      defaults.day_shift
    );
    fill(
      &mut self.morning_shift,
      defaults.morning_shift
    );
    fill(&mut self.rest, defaults.rest);
    fill(
      &mut self.paid_leave,
      defaults.paid_leave
    );
    fill_map(&mut self.extra, defaults.extra);
  }
}

fn merge_section<T>(
  slot: &mut Option<Leaf<T>>,
  defaults: Option<Leaf<T>>,
  fill_from: fn(&mut T, T)
) {
  if slot.is_none() {
    *slot = defaults;
    return;
  }
  if let (
    Some(Leaf::Typed(user)),
    Some(Leaf::Typed(defaults))
  ) = (slot.as_mut(), defaults)
  {
    fill_from(user, defaults);
  }
}

fn fill<T>(
  slot: &mut Option<T>,
  default: Option<T>
) {
  if slot.is_none() {
    *slot = default;
  }
}

fn fill_map<V>(
  map: &mut BTreeMap<String, V>,
  defaults: BTreeMap<String, V>
) {
  for (key, value) in defaults {
    map.entry(key).or_insert(value);
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
  Defaults,
  File(PathBuf),
  Fallback {
    path:   PathBuf,
    reason: String
  }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
  pub config: ShiftConfig,
  pub source: ConfigSource
}

impl LoadedConfig {
  fn defaults(source: ConfigSource) -> Self {
    Self {
      config: ShiftConfig::defaults(),
      source
    }
  }

  fn fallback(
    path: &Path,
    reason: String
  ) -> Self {
    Self::defaults(ConfigSource::Fallback {
      path: path.to_path_buf(),
      reason
    })
  }
}

/// Resolves and loads the shift config.
/// Problems are logged and answered with
/// the defaults; this never fails.
#[tracing::instrument(skip(override_path))]
pub fn load_config(
  override_path: Option<&Path>
) -> LoadedConfig {
  match resolve_config_path(override_path)
  {
    | Some(path) => load_config_from(&path),
    | None => {
      warn!(
        "no shift config found; using \
         defaults"
      );
      LoadedConfig::defaults(
        ConfigSource::Defaults
      )
    }
  }
}

/// Any JSON object is accepted and merged;
/// only unreadable files, syntax errors and
/// a non-object document fall back.
#[tracing::instrument]
pub fn load_config_from(
  path: &Path
) -> LoadedConfig {
  if !path.exists() {
    warn!(
      file = %path.display(),
      "shift config file not found; using defaults"
    );
    return LoadedConfig::fallback(
      path,
      "file not found".to_string()
    );
  }

  let raw = match fs::read_to_string(path)
  {
    | Ok(raw) => raw,
    | Err(err) => {
      error!(
        file = %path.display(),
        error = %err,
        "failed reading shift config; using defaults"
      );
      return LoadedConfig::fallback(
        path,
        err.to_string()
      );
    }
  };

  let parsed = match serde_json::from_str::<
    ShiftConfig
  >(&raw)
  {
    | Ok(parsed) => parsed,
    | Err(err) => {
      error!(
        file = %path.display(),
        error = %err,
        "malformed shift config; using defaults"
      );
      return LoadedConfig::fallback(
        path,
        err.to_string()
      );
    }
  };

  info!(
    file = %path.display(),
    "loaded shift config"
  );
  LoadedConfig {
    config: parsed.merged_over_defaults(),
    source: ConfigSource::File(
      path.to_path_buf()
    )
  }
}

/// Where to look for the shift config, in
/// order: an explicit path, the
/// `SHIFTCAL_CONFIG` value, `config.json`
/// in the working directory, then
/// `shiftcal/config.json` under the user
/// config directory.
#[derive(Debug, Clone)]
pub struct ConfigSearch {
  pub env_path:        Option<String>,
  pub working_dir:     PathBuf,
  pub user_config_dir: Option<PathBuf>
}

impl ConfigSearch {
  pub fn from_process() -> Self {
    Self {
      env_path:        std::env::var(
        CONFIG_ENV_VAR
      )
      .ok(),
      working_dir:     std::env::current_dir()
        .unwrap_or_else(|_| {
          PathBuf::from(".")
        }),
      user_config_dir: dirs::config_dir()
    }
  }

  #[tracing::instrument(skip(
    self,
    override_path
  ))]
  pub fn resolve(
    &self,
    override_path: Option<&Path>
  ) -> Option<PathBuf> {
    if let Some(path) = override_path {
      return Some(path.to_path_buf());
    }

    if let Some(raw) = &self.env_path {
      let trimmed = raw.trim();
      if !trimmed.is_empty() {
        debug!(
          path = %trimmed,
          "config path from environment"
        );
        return Some(PathBuf::from(trimmed));
      }
    }

    let local = self
      .working_dir
      .join(CONFIG_FILE_NAME);
    if local.exists() {
      return Some(local);
    }

    let user = self
      .user_config_dir
      .as_ref()?
      .join("shiftcal")
      .join(CONFIG_FILE_NAME);
    if user.exists() {
      return Some(user);
    }

    None
  }
}

pub fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  ConfigSearch::from_process()
    .resolve(override_path)
}

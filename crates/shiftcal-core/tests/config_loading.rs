use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use shiftcal_core::config::{
    CONFIG_FILE_NAME, ConfigSearch, ConfigSource, Leaf, ShiftConfig, load_config, load_config_from,
};
use tempfile::tempdir;

#[test]
fn file_values_are_merged_over_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "staff": { "list": ["佐藤", "鈴木", "高橋", "田中"], "dayShiftOnlyCount": 1 },
            "constraints": { "preventSamePair": false },
            "shiftTypes": { "24HourShifts": ["24A"] }
        }"#,
    )
    .expect("write config");

    let loaded = load_config(Some(path.as_path()));
    assert_eq!(loaded.source, ConfigSource::File(path.clone()));

    let cfg = loaded.config;
    assert_eq!(cfg.day_shift_only_staff(), ["佐藤"]);
    assert!(!cfg.prevent_same_pair());
    assert_eq!(cfg.max_consecutive_24_shifts(), 2);
    assert_eq!(cfg.hour_24_shifts(), vec!["24A".to_string()]);
    assert_eq!(cfg.day_shift_label(), "日勤");
    assert_eq!(cfg.shift_hours("夜勤"), Some(16.0));
    assert_eq!(cfg.same_pair_penalty(), 100_000.0);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("absent.json");

    let loaded = load_config_from(&path);
    assert_eq!(loaded.config, ShiftConfig::defaults());
    assert!(matches!(loaded.source, ConfigSource::Fallback { .. }));
}

#[test]
fn malformed_json_is_replaced_wholesale() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, r#"{ "staff": { "list": ["A"] }, "#).expect("write config");

    let loaded = load_config_from(&path);
    assert_eq!(loaded.config, ShiftConfig::defaults());
    match loaded.source {
        ConfigSource::Fallback { path: p, reason } => {
            assert_eq!(p, path);
            assert!(!reason.is_empty());
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[test]
fn non_object_section_is_kept_as_written() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(
        &path,
        r#"{ "staff": { "list": ["A"] }, "penalties": "high" }"#,
    )
    .expect("write config");

    let loaded = load_config_from(&path);
    assert_eq!(loaded.source, ConfigSource::File(path.clone()));
    assert_eq!(loaded.config.staff_list(), ["A"]);
    assert_eq!(loaded.config.penalties, Some(Leaf::Raw(json!("high"))));
    assert_eq!(loaded.config.same_pair_penalty(), 100_000.0);
}

#[test]
fn fractional_penalty_keeps_staff_list() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "staff": { "list": ["佐藤", "鈴木", "高橋", "田中"], "dayShiftOnlyCount": "2" },
            "penalties": { "hoursDifferenceMultiplier": 1.5 },
            "constraints": { "targetHoursMax": 168.5 }
        }"#,
    )
    .expect("write config");

    let loaded = load_config_from(&path);
    assert_eq!(loaded.source, ConfigSource::File(path.clone()));

    let cfg = loaded.config;
    assert_eq!(cfg.staff_list().len(), 4);
    assert_eq!(cfg.hours_difference_multiplier(), 1.5);
    assert_eq!(cfg.day_shift_only_staff(), ["佐藤", "鈴木"]);
    assert_eq!(cfg.target_hours_max(), 168.5);
    assert_eq!(cfg.relaxed_hours_max(), 200.0);
}

#[test]
fn non_object_document_is_replaced_wholesale() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, r#"["staff"]"#).expect("write config");

    let loaded = load_config_from(&path);
    assert_eq!(loaded.config, ShiftConfig::defaults());
    assert!(matches!(loaded.source, ConfigSource::Fallback { .. }));
}

#[test]
fn merged_config_round_trips_through_json() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, r#"{ "ward": { "name": "3F" }, "penalties": { "requiredStaffPenalty": 42 } }"#)
        .expect("write config");

    let cfg = load_config_from(&path).config;
    assert_eq!(cfg.required_staff_penalty(), 42.0);

    let text = serde_json::to_string(&cfg).expect("serialize");
    let reparsed: ShiftConfig = serde_json::from_str(&text).expect("reparse");
    assert_eq!(reparsed, cfg);
    assert_eq!(reparsed.extra["ward"]["name"], "3F");
}

fn search(env_path: Option<&str>, working_dir: &Path, user_config_dir: &Path) -> ConfigSearch {
    ConfigSearch {
        env_path: env_path.map(str::to_string),
        working_dir: working_dir.to_path_buf(),
        user_config_dir: Some(user_config_dir.to_path_buf()),
    }
}

#[test]
fn config_lookup_order() {
    let work = tempdir().expect("tempdir");
    let home = tempdir().expect("tempdir");
    let explicit = Path::new("/srv/ward/config.json");

    let user_file = home.path().join("shiftcal").join(CONFIG_FILE_NAME);
    fs::create_dir_all(user_file.parent().expect("parent")).expect("mkdir");
    fs::write(&user_file, "{}").expect("write config");

    let only_user = search(None, work.path(), home.path());
    assert_eq!(only_user.resolve(None), Some(user_file.clone()));

    let local_file = work.path().join(CONFIG_FILE_NAME);
    fs::write(&local_file, "{}").expect("write config");
    assert_eq!(only_user.resolve(None), Some(local_file.clone()));

    let blank_env = search(Some("  "), work.path(), home.path());
    assert_eq!(blank_env.resolve(None), Some(local_file));

    let with_env = search(Some("/etc/shiftcal.json"), work.path(), home.path());
    assert_eq!(with_env.resolve(None), Some(PathBuf::from("/etc/shiftcal.json")));
    assert_eq!(with_env.resolve(Some(explicit)), Some(explicit.to_path_buf()));
}

#[test]
fn config_lookup_finds_nothing() {
    let work = tempdir().expect("tempdir");
    let home = tempdir().expect("tempdir");

    assert_eq!(search(None, work.path(), home.path()).resolve(None), None);

    let no_home = ConfigSearch {
        env_path: None,
        working_dir: work.path().to_path_buf(),
        user_config_dir: None,
    };
    assert_eq!(no_home.resolve(None), None);
}

//! Scheduling settings and TOML configuration file support.
//!
//! Settings control slot generation and capacity rules. They are read once at
//! startup from `scheduler.toml` (with per-field defaults) and snapshotted
//! onto each period at creation time, so editing the file never changes the
//! rules of a period already in flight.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::time::ClockTime;

/// A mid-day break; no defense may start inside it, and a slot walk that
/// lands on the break start jumps past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakWindow {
    pub at: ClockTime,
    pub duration_minutes: u16,
}

/// Scheduling rules and working-hours layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingSettings {
    /// Ceiling on concurrently committed advisory cases per advisor.
    #[serde(default = "default_max_defenses_per_advisor")]
    pub max_defenses_per_advisor: u32,
    /// Upper bound on examiner assignments within one event.
    #[serde(default = "default_max_examiners_per_event")]
    pub max_examiners_per_event: usize,
    /// Examiner count the automatic generator aims for per event.
    #[serde(default = "default_examiners_per_event")]
    pub examiners_per_event: usize,
    #[serde(default = "default_defense_duration")]
    pub defense_duration_minutes: u16,
    /// Idle gap inserted between consecutive slots in the same room.
    #[serde(default = "default_gap")]
    pub gap_minutes: u16,
    #[serde(default = "default_day_start")]
    pub day_start: ClockTime,
    #[serde(default = "default_day_end")]
    pub day_end: ClockTime,
    /// Lowercase English weekday names with no defenses, e.g. "saturday".
    #[serde(default = "default_weekly_holidays")]
    pub weekly_holidays: Vec<String>,
    /// Ad-hoc dates with no defenses.
    #[serde(default)]
    pub special_holidays: Vec<NaiveDate>,
    #[serde(default = "default_breaks")]
    pub breaks: Vec<BreakWindow>,
}

fn default_max_defenses_per_advisor() -> u32 {
    4
}

fn default_max_examiners_per_event() -> usize {
    4
}

fn default_examiners_per_event() -> usize {
    3
}

fn default_defense_duration() -> u16 {
    90
}

fn default_gap() -> u16 {
    15
}

fn default_day_start() -> ClockTime {
    ClockTime::from_hm(8, 0).expect("static time")
}

fn default_day_end() -> ClockTime {
    ClockTime::from_hm(16, 0).expect("static time")
}

fn default_weekly_holidays() -> Vec<String> {
    vec!["saturday".to_string(), "sunday".to_string()]
}

fn default_breaks() -> Vec<BreakWindow> {
    vec![BreakWindow {
        at: ClockTime::from_hm(12, 0).expect("static time"),
        duration_minutes: 60,
    }]
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        // Deserializing an empty table applies every per-field default.
        toml::from_str("").expect("empty settings table must deserialize")
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

impl SchedulingSettings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings: SchedulingSettings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default location, falling back to built-in
    /// defaults when no `scheduler.toml` is present.
    ///
    /// Searches for `scheduler.toml` in the current directory and the parent
    /// directory.
    pub fn from_default_location() -> anyhow::Result<Self> {
        let search_paths = vec![
            PathBuf::from("scheduler.toml"),
            PathBuf::from("../scheduler.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Whether no defense may be scheduled on the given date.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        let name = weekday_name(date.weekday());
        self.weekly_holidays.iter().any(|d| d == name) || self.special_holidays.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SchedulingSettings::default();
        assert_eq!(settings.max_defenses_per_advisor, 4);
        assert_eq!(settings.max_examiners_per_event, 4);
        assert_eq!(settings.examiners_per_event, 3);
        assert_eq!(settings.day_start.to_string(), "08:00");
        assert_eq!(settings.day_end.to_string(), "16:00");
        assert_eq!(settings.breaks.len(), 1);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
max_defenses_per_advisor = 2
day_start = "09:00"
weekly_holidays = ["friday", "saturday"]
special_holidays = ["2025-05-01"]

[[breaks]]
at = "12:30"
duration_minutes = 45
"#;

        let settings: SchedulingSettings = toml::from_str(toml).unwrap();
        assert_eq!(settings.max_defenses_per_advisor, 2);
        assert_eq!(settings.day_start.to_string(), "09:00");
        // Untouched fields keep their defaults.
        assert_eq!(settings.defense_duration_minutes, 90);
        assert_eq!(settings.breaks[0].at.to_string(), "12:30");
        assert!(settings.is_holiday(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()));
    }

    #[test]
    fn test_is_holiday_weekly() {
        let settings = SchedulingSettings::default();
        // 2025-05-03 is a Saturday, 2025-05-05 a Monday.
        assert!(settings.is_holiday(NaiveDate::from_ymd_opt(2025, 5, 3).unwrap()));
        assert!(!settings.is_holiday(NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()));
    }
}

//! Configuration loading and management.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Weekday};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use stt_core::category::DEFAULT_BREAK_COMMENTS;
use stt_core::duration::parse_duration;
use stt_core::{BreakTimeCategorizer, ItemLog, WeeklyWorkingTime};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the activity log.
    pub log_path: PathBuf,

    /// Comments that mark an item as a break.
    pub break_comments: Vec<String>,

    /// Required working time per day.
    #[serde(default)]
    pub working_time: WorkingTimeConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_path", &self.log_path)
            .field("break_comments", &self.break_comments)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            log_path: data_dir.join("activities"),
            break_comments: DEFAULT_BREAK_COMMENTS.map(String::from).to_vec(),
            working_time: WorkingTimeConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, `~/.config/stt/config.toml`, the given
    /// file, then `STT_*` environment variables (`__` separates nested keys,
    /// e.g. `STT_WORKING_TIME__FRIDAY=6h`).
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("STT_").split("__"));

        figment.extract()
    }

    pub fn item_log(&self) -> ItemLog {
        ItemLog::new(&self.log_path)
    }

    pub fn categorizer(&self) -> BreakTimeCategorizer {
        BreakTimeCategorizer::new(&self.break_comments)
    }
}

/// Working time per weekday plus per-date overrides, as duration strings
/// such as `8h` or `7h30m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingTimeConfig {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
    /// `YYYY-MM-DD` -> duration.
    pub overrides: BTreeMap<String, String>,
}

impl Default for WorkingTimeConfig {
    fn default() -> Self {
        let weekday = || "8h".to_string();
        Self {
            monday: weekday(),
            tuesday: weekday(),
            wednesday: weekday(),
            thursday: weekday(),
            friday: weekday(),
            saturday: "0".to_string(),
            sunday: "0".to_string(),
            overrides: BTreeMap::new(),
        }
    }
}

impl WorkingTimeConfig {
    /// Builds the schedule, validating every duration and date.
    pub fn schedule(&self) -> Result<WeeklyWorkingTime> {
        let days = [
            (Weekday::Mon, &self.monday),
            (Weekday::Tue, &self.tuesday),
            (Weekday::Wed, &self.wednesday),
            (Weekday::Thu, &self.thursday),
            (Weekday::Fri, &self.friday),
            (Weekday::Sat, &self.saturday),
            (Weekday::Sun, &self.sunday),
        ];

        let mut schedule = WeeklyWorkingTime::default();
        for (weekday, value) in days {
            let duration = parse_duration(value)
                .with_context(|| format!("invalid working time for {weekday}"))?;
            schedule = schedule.with_weekday(weekday, duration);
        }

        for (date, value) in &self.overrides {
            let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("invalid working time override date: {date}"))?;
            let duration = parse_duration(value)
                .with_context(|| format!("invalid working time override for {date}"))?;
            schedule = schedule.with_override(day, duration);
        }

        Ok(schedule)
    }
}

/// Returns the platform-specific config directory for stt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("stt"))
}

/// Returns the platform-specific data directory for stt.
///
/// On Linux: `~/.local/share/stt`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("stt"))
}

use chrono::NaiveTime;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use planner_core::models::ReminderConfig;
use planner_core::notify::PermissionStatus;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Directory holding TASKS.json and NOTIFICATIONS.json
    pub data_dir: PathBuf,
    /// Sort order used by `list` when none is given
    pub default_sort: String,
    /// Category filter used by `list` when none is given
    pub default_category: String,
    pub notifications: NotificationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_sort: "date-asc".to_string(),
            default_category: "all".to_string(),
            notifications: NotificationConfig::default(),
        }
    }
}

/// Reminder settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NotificationConfig {
    /// Whether notification delivery is permitted at all
    pub enabled: bool,
    /// Hour of the due day at which a task reminder fires
    pub reminder_hour: u32,
    pub summary_hour: u32,
    pub summary_minute: u32,
    /// Register the recurring daily summary
    pub daily_summary: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        let core = ReminderConfig::default();
        Self {
            enabled: true,
            reminder_hour: core.reminder_hour,
            summary_hour: 8,
            summary_minute: 0,
            daily_summary: core.daily_summary_enabled,
        }
    }
}

impl NotificationConfig {
    pub fn permission(&self) -> PermissionStatus {
        if self.enabled {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    /// Out-of-range times fall back to the core defaults.
    pub fn to_reminder_config(&self) -> ReminderConfig {
        let defaults = ReminderConfig::default();
        let reminder_hour = if self.reminder_hour < 24 {
            self.reminder_hour
        } else {
            defaults.reminder_hour
        };
        ReminderConfig {
            reminder_hour,
            daily_summary_time: NaiveTime::from_hms_opt(self.summary_hour, self.summary_minute, 0)
                .unwrap_or(defaults.daily_summary_time),
            daily_summary_enabled: self.daily_summary,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("PLANNER_").split("__"))
            .extract()
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("planner"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_sort, "date-asc");
        assert_eq!(config.default_category, "all");

        let reminders = config.notifications.to_reminder_config();
        assert_eq!(reminders.reminder_hour, 9);
        assert_eq!(reminders.daily_summary_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert!(reminders.daily_summary_enabled);
        assert_eq!(config.notifications.permission(), PermissionStatus::Granted);
    }

    #[test]
    fn test_out_of_range_times_fall_back() {
        let notifications = NotificationConfig {
            reminder_hour: 30,
            summary_hour: 25,
            ..Default::default()
        };
        let reminders = notifications.to_reminder_config();
        assert_eq!(reminders.reminder_hour, 9);
        assert_eq!(reminders.daily_summary_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    }
}

//! TOML configuration for the exporters.
//!
//! Every field has a default, so an empty file (or no file) reproduces the
//! stock calendar. Example:
//!
//! ```toml
//! [calendar]
//! name = "Calendario Ritual del Templo"
//! alarm_lead_hours = 4
//!
//! [reminders]
//! hour = 9
//! sound = "campana.wav"
//!
//! [[rules]]
//! month = 12
//! day = 24
//! title = "Ceremonia de Limpieza"
//! major = true
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::CalendarError;
use crate::observance::{Category, ObservanceRule, RuleSet, Trigger};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// iCalendar document settings.
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Reminder payload settings.
    #[serde(default)]
    pub reminders: ReminderConfig,

    /// Extra observance rules, resolved after the standard ones.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    #[serde(default = "default_prod_id")]
    pub prod_id: String,
    /// Calendar name; the year is appended.
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_uid_prefix")]
    pub uid_prefix: String,
    #[serde(default = "default_uid_domain")]
    pub uid_domain: String,
    /// Hours before the all-day event start at which the alarm fires.
    #[serde(default = "default_alarm_lead_hours")]
    pub alarm_lead_hours: u32,
}

fn default_prod_id() -> String {
    "-//TaoistTemple//Calendar//ES".to_string()
}
fn default_name() -> String {
    "Calendario Ritual del Templo".to_string()
}
fn default_uid_prefix() -> String {
    "taoist".to_string()
}
fn default_uid_domain() -> String {
    "temple.app".to_string()
}
fn default_alarm_lead_hours() -> u32 {
    4
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            prod_id: default_prod_id(),
            name: default_name(),
            uid_prefix: default_uid_prefix(),
            uid_domain: default_uid_domain(),
            alarm_lead_hours: default_alarm_lead_hours(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReminderConfig {
    /// Local hour (`0..=23`) on the day before the event.
    #[serde(default = "default_reminder_hour")]
    pub hour: u32,
    /// Notification sound; platform default when unset.
    #[serde(default)]
    pub sound: Option<String>,
    /// Notification icon; platform default when unset.
    #[serde(default)]
    pub icon: Option<String>,
}

fn default_reminder_hour() -> u32 {
    9
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            hour: default_reminder_hour(),
            sound: None,
            icon: None,
        }
    }
}

/// Rule in the legacy data shape: `month = 0` means every month and the
/// category may be missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub month: u32,
    pub day: u32,
    pub title: String,
    #[serde(default)]
    pub local_title: Option<String>,
    #[serde(default)]
    pub major: bool,
    #[serde(default)]
    pub category: Option<Category>,
}

impl RuleConfig {
    /// Converts into a typed rule, inferring a missing category from the
    /// title.
    pub fn to_rule(&self) -> Result<ObservanceRule, CalendarError> {
        if self.month > 12 || !(1..=30).contains(&self.day) {
            return Err(CalendarError::Config {
                message: format!(
                    "rule {:?}: month {} / day {} out of range (month 0..=12, day 1..=30)",
                    self.title, self.month, self.day
                ),
            });
        }
        let trigger = match self.month {
            0 => Trigger::EveryMonth { day: self.day },
            month => Trigger::Fixed {
                month,
                day: self.day,
            },
        };
        let category = match self.category {
            Some(category) => category,
            None => {
                let inferred = Category::infer_from_title(&self.title);
                debug!(title = %self.title, ?inferred, "rule without category, inferred from title");
                inferred
            }
        };
        Ok(ObservanceRule {
            trigger,
            title: self.title.clone().into(),
            local_title: self.local_title.clone().map(Into::into),
            is_major: self.major,
            category,
        })
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, CalendarError> {
        let config: Config = toml::from_str(text).map_err(|e| CalendarError::Config {
            message: e.to_string(),
        })?;
        if config.reminders.hour > 23 {
            return Err(CalendarError::Config {
                message: format!("reminders.hour {} out of range 0..=23", config.reminders.hour),
            });
        }
        config.rule_set()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, CalendarError> {
        let text = std::fs::read_to_string(path).map_err(|e| CalendarError::Config {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml(&text)
    }

    /// The standard rules plus the configured ones.
    pub fn rule_set(&self) -> Result<RuleSet, CalendarError> {
        let extra = self
            .rules
            .iter()
            .map(RuleConfig::to_rule)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleSet::with_extra(extra))
    }
}

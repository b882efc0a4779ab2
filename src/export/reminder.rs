//! Notification payload for major observances.
//!
//! Computes what a platform notification service should register: one
//! reminder per major observance, firing the day before at a configured local
//! hour. Requesting permission and cancelling earlier batches are left to the
//! consumer.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeDelta, TimeZone};
use serde::Serialize;
use tracing::{debug, warn};

use crate::almanac;
use crate::chinese::fmt;
use crate::config::Config;
use crate::error::CalendarError;

/// One scheduled notification.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Unique within one batch, starting at 1.
    pub id: u32,
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Builds the reminders of Gregorian `year` that are still ahead of `now`.
///
/// Each major observance yields a reminder at `config.reminders.hour` on the
/// preceding day, in the time zone of `now`. Reminders firing at or before
/// `now` are dropped.
///
/// # Errors
///
/// [`CalendarError::YearOutOfRange`] for years outside 1900..=2100, and
/// [`CalendarError::Config`] for an invalid reminder hour or extra rule.
/// For 1900 only days from 1900-01-31 on are considered, see
/// [`almanac::days_of_year`].
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use nongli::Config;
/// use nongli::export::build_reminder_schedule;
///
/// let tz = FixedOffset::east_opt(8 * 3600).unwrap();
/// let now = tz.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let reminders = build_reminder_schedule(2024, &now, &Config::default()).unwrap();
/// assert_eq!("Nochevieja China 除夕", reminders[0].title);
/// assert_eq!("2024-02-08T09:00:00+08:00", reminders[0].fire_at.to_rfc3339());
/// ```
#[tracing::instrument(skip(now, config))]
pub fn build_reminder_schedule<Tz: TimeZone>(
    year: i32,
    now: &DateTime<Tz>,
    config: &Config,
) -> Result<Vec<Reminder>, CalendarError> {
    let settings = &config.reminders;
    if settings.hour > 23 {
        return Err(CalendarError::Config {
            message: format!("reminders.hour {} out of range 0..=23", settings.hour),
        });
    }
    let rules = config.rule_set()?;
    let tz = now.timezone();

    let mut reminders = Vec::new();
    for day in almanac::year_events(year, &rules)? {
        let majors: Vec<_> = day.observances.iter().filter(|o| o.is_major).collect();
        if majors.is_empty() {
            continue;
        }
        let eve = day.date + -1;
        let Some(local) = eve
            .to_naive()
            .and_then(|d| d.and_hms_opt(settings.hour, 0, 0))
        else {
            return Err(CalendarError::DateOutOfRange { date: eve });
        };
        let Some(fire_at) = resolve_local(&tz, local) else {
            warn!(date = %day.date, %local, "no valid local time for reminder, skipped");
            continue;
        };
        if fire_at <= *now {
            continue;
        }
        for observance in majors {
            reminders.push(Reminder {
                id: reminders.len() as u32 + 1,
                title: observance.summary(),
                body: format!("Mañana: {}", fmt::description_es(&day.lunar)),
                fire_at: fire_at.fixed_offset(),
                sound: settings.sound.clone(),
                icon: settings.icon.clone(),
            });
        }
    }
    debug!(reminders = reminders.len(), "reminder schedule built");
    Ok(reminders)
}

/// [`build_reminder_schedule`] relative to the current local time.
pub fn build_reminder_schedule_now(
    year: i32,
    config: &Config,
) -> Result<Vec<Reminder>, CalendarError> {
    build_reminder_schedule(year, &Local::now(), config)
}

/// Maps a local wall-clock time to an instant. Ambiguous times take the
/// earlier instant; times inside a DST gap move forward one hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&local).earliest().or_else(|| {
        tz.from_local_datetime(&(local + TimeDelta::hours(1)))
            .earliest()
    })
}

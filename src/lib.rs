//! Chinese lunisolar dates and temple observances for 1900–2100.
//!
//! Gregorian dates in the range 1900-01-31 ..= 2100-12-31 are converted into
//! the traditional Chinese calendar from a precomputed per-year table. A
//! fixed set of ceremonial observances is matched against lunar dates, and a
//! Gregorian year of observances can be exported as an iCalendar document or
//! as a batch of reminders.
//!
//! # Examples
//!
//! Basic usage with [`Date`]:
//!
//! ```
//! use nongli::Date;
//!
//! let date: Date = "2000-01-01".parse().unwrap();
//!
//! assert_eq!(2451545, date.jdn());
//! assert_eq!("2000-01-01", date.iso_gregorian());
//! ```
//!
//! Chinese lunisolar calendar:
//!
//! ```
//! use nongli::Date;
//! use nongli::chinese::{LunarDate, Month::*};
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//! let lunar = LunarDate::from_date(date).unwrap();
//!
//! assert_eq!((1999, Common(11), 25), (lunar.year(), lunar.month(), lunar.day()));
//! assert_eq!("1999年冬月廿五", lunar.to_string());
//! ```
//!
//! Observances and export:
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use nongli::almanac::year_events;
//! use nongli::export::export_year;
//! use nongli::observance::RuleSet;
//!
//! let days = year_events(2024, &RuleSet::standard()).unwrap();
//! assert_eq!(32, days.len());
//!
//! let ics = export_year(2024, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()).unwrap();
//! assert!(ics.contains("DTSTART;VALUE=DATE:20240210\r\n"));
//! ```

pub mod almanac;
pub mod chinese;
pub mod config;
pub mod date;
pub mod error;
pub mod export;
pub mod observance;

pub use chinese::{LunarDate, LunarYear, Month};
pub use config::Config;
pub use date::{Date, YearType};
pub use error::CalendarError;

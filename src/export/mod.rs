//! Serializations of a year of observances for external consumers.
//!
//! [`ics`] produces an iCalendar document for third-party calendar
//! applications; [`reminder`] computes the batch of notifications a platform
//! scheduler should register.

pub mod ics;
pub mod reminder;

pub use ics::{IcsExporter, export_year};
pub use reminder::{Reminder, build_reminder_schedule};

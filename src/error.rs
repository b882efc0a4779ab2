//! Error types for the nongli crate.

use crate::chinese::Month;
use crate::date::Date;

/// Error type for all fallible operations in the nongli crate.
///
/// The two range variants are the only failures a well-formed caller can
/// hit; the rest report malformed input (date text, lunar fields,
/// configuration files).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a Gregorian date falls outside 1900-01-31..=2100-12-31.
    #[error("date {date} is outside the supported range 1900-01-31..=2100-12-31")]
    DateOutOfRange {
        /// The rejected date.
        date: Date,
    },

    /// Returned when a year falls outside 1900..=2100.
    #[error("year {year} is outside the supported range 1900..=2100")]
    YearOutOfRange {
        /// The rejected year.
        year: i32,
    },

    /// Returned when date text is not a valid `YYYY-MM-DD` Gregorian date.
    #[error("invalid date: {input:?} (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The text that failed to parse.
        input: String,
    },

    /// Returned when a lunar month number is outside 1..=12.
    #[error("invalid lunar month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number.
        month: u32,
    },

    /// Returned when a lunar date does not exist in the given year.
    #[error("lunar date {year}/{month}/{day} does not exist")]
    InvalidLunarDate {
        /// Lunar year.
        year: i32,
        /// Lunar month, common or leap.
        month: Month,
        /// Day within the month.
        day: u32,
    },

    /// Returned when a configuration file cannot be read or parsed.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the failure.
        message: String,
    },
}

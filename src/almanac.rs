//! Day-by-day walk over a Gregorian year, resolving each day's observances.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::chinese::{self, LunarDate, data};
use crate::date::Date;
use crate::error::CalendarError;
use crate::observance::{DayMarker, Observance, RuleSet};

/// A Gregorian day with at least one observance.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DayEvents {
    pub date: Date,
    pub lunar: LunarDate,
    /// Non-empty, in resolution order.
    pub observances: Vec<Observance>,
}

impl DayEvents {
    /// Grid indicator for the day.
    pub fn marker(&self) -> Option<DayMarker> {
        DayMarker::for_observances(&self.observances)
    }
}

/// Every Gregorian day of `year` that has a lunar representation, in order.
///
/// For 1900 the walk begins at the epoch, 1900-01-31; earlier days have no
/// table data and are skipped with a warning.
///
/// # Errors
///
/// [`CalendarError::YearOutOfRange`] for years outside 1900..=2100.
///
/// ```
/// use nongli::almanac::days_of_year;
///
/// assert_eq!(366, days_of_year(2024).unwrap().count());
/// assert_eq!(335, days_of_year(1900).unwrap().count());
/// assert!(days_of_year(2101).is_err());
/// ```
pub fn days_of_year(year: i32) -> Result<impl Iterator<Item = Date>, CalendarError> {
    let out_of_range = || CalendarError::YearOutOfRange { year };
    if !(data::FIRST_YEAR..=data::LAST_YEAR).contains(&year) {
        return Err(out_of_range());
    }
    let first = Date::from_gregorian(year, 1, 1).ok_or_else(out_of_range)?;
    let last = Date::from_gregorian(year, 12, 31).ok_or_else(out_of_range)?;
    let start = first.max(chinese::epoch());
    if start != first {
        warn!(
            year,
            start = %start,
            skipped = start - first,
            "year begins before the epoch, earlier days have no lunar date and are skipped"
        );
    }
    Ok((0..=(last - start)).map(move |i| start + i))
}

/// Walks `year` day by day and collects the days with observances.
#[tracing::instrument(skip(rules))]
pub fn year_events(year: i32, rules: &RuleSet) -> Result<Vec<DayEvents>, CalendarError> {
    let mut days = Vec::new();
    for date in days_of_year(year)? {
        let lunar = LunarDate::from_date(date)?;
        let observances = rules.resolve(&lunar);
        if observances.is_empty() {
            continue;
        }
        trace!(date = %date, lunar = %lunar, n = observances.len(), "observances resolved");
        days.push(DayEvents {
            date,
            lunar,
            observances,
        });
    }
    debug!(
        days = days.len(),
        observances = days.iter().map(|d| d.observances.len()).sum::<usize>(),
        "year walked"
    );
    Ok(days)
}

/// Groups days by Gregorian month (`1..=12`), for a printable year summary.
pub fn by_month(days: Vec<DayEvents>) -> BTreeMap<i32, Vec<DayEvents>> {
    let mut months: BTreeMap<i32, Vec<DayEvents>> = BTreeMap::new();
    for day in days {
        months.entry(day.date.gregorian().1).or_default().push(day);
    }
    months
}

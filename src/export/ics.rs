//! iCalendar (RFC 5545) export.
//!
//! One all-day `VEVENT` per resolved observance, each with a display alarm a
//! few hours before the start of the day. Event identifiers are derived from
//! the date, the category and the producing rule, so exporting the same year
//! twice with the same timestamp yields the same bytes.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::almanac::{self, DayEvents};
use crate::chinese::fmt;
use crate::config::{CalendarConfig, Config};
use crate::error::CalendarError;
use crate::observance::{Observance, RuleSet};

/// Content lines longer than this many octets (excluding CRLF) are folded.
const MAX_LINE_OCTETS: usize = 75;

/// Renders years of observances as iCalendar documents.
#[derive(Debug, Clone, Default)]
pub struct IcsExporter {
    calendar: CalendarConfig,
    rules: RuleSet,
}

impl IcsExporter {
    pub fn new(calendar: CalendarConfig, rules: RuleSet) -> Self {
        Self { calendar, rules }
    }

    /// Exporter using the calendar settings and extra rules of `config`.
    pub fn from_config(config: &Config) -> Result<Self, CalendarError> {
        Ok(Self::new(config.calendar.clone(), config.rule_set()?))
    }

    /// Event identifier, unique per observance within a document.
    ///
    /// ```
    /// use nongli::Date;
    /// use nongli::almanac::year_events;
    /// use nongli::export::IcsExporter;
    /// use nongli::observance::RuleSet;
    ///
    /// let days = year_events(2024, &RuleSet::standard()).unwrap();
    /// let new_year = days.iter().find(|d| d.date == Date::from_gregorian(2024, 2, 10).unwrap()).unwrap();
    /// let exporter = IcsExporter::default();
    /// assert_eq!(
    ///     "taoist-20240210-ceremony-r02@temple.app",
    ///     exporter.uid(new_year, &new_year.observances[1]),
    /// );
    /// ```
    pub fn uid(&self, day: &DayEvents, observance: &Observance) -> String {
        format!(
            "{}-{}-{}-{}@{}",
            self.calendar.uid_prefix,
            day.date.basic_gregorian(),
            observance.category.slug(),
            observance.origin.slug(),
            self.calendar.uid_domain,
        )
    }

    /// Renders every observance of Gregorian `year`.
    ///
    /// `generated_at` becomes the `DTSTAMP` of every event.
    ///
    /// # Errors
    ///
    /// [`CalendarError::YearOutOfRange`] for years outside 1900..=2100. For
    /// 1900 the document starts at 1900-01-31, see
    /// [`almanac::days_of_year`].
    #[tracing::instrument(skip(self, generated_at))]
    pub fn export_year(
        &self,
        year: i32,
        generated_at: DateTime<Utc>,
    ) -> Result<String, CalendarError> {
        let days = almanac::year_events(year, &self.rules)?;
        let dtstamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();

        let mut doc = Document::default();
        doc.line("BEGIN:VCALENDAR");
        doc.line("VERSION:2.0");
        doc.text("PRODID", &self.calendar.prod_id);
        doc.line("CALSCALE:GREGORIAN");
        doc.line("METHOD:PUBLISH");
        doc.text("X-WR-CALNAME", &format!("{} {}", self.calendar.name, year));

        let mut events = 0;
        for day in &days {
            for observance in &day.observances {
                self.event(&mut doc, day, observance, &dtstamp);
                events += 1;
            }
        }
        doc.line("END:VCALENDAR");

        debug!(events, octets = doc.buf.len(), "calendar rendered");
        Ok(doc.buf)
    }

    /// [`export_year`](Self::export_year) stamped with the current time.
    pub fn export_year_now(&self, year: i32) -> Result<String, CalendarError> {
        self.export_year(year, Utc::now())
    }

    fn event(&self, doc: &mut Document, day: &DayEvents, observance: &Observance, dtstamp: &str) {
        doc.line("BEGIN:VEVENT");
        doc.text("UID", &self.uid(day, observance));
        doc.line(&format!("DTSTAMP:{dtstamp}"));
        doc.line(&format!("DTSTART;VALUE=DATE:{}", day.date.basic_gregorian()));
        doc.text("SUMMARY", &observance.summary());
        doc.text("DESCRIPTION", &fmt::description_es(&day.lunar));
        doc.line("TRANSP:TRANSPARENT");
        doc.line("BEGIN:VALARM");
        doc.line(&format!("TRIGGER:-PT{}H", self.calendar.alarm_lead_hours));
        doc.line("ACTION:DISPLAY");
        doc.text(
            "DESCRIPTION",
            &format!("Recordatorio: {} mañana", observance.title),
        );
        doc.line("END:VALARM");
        doc.line("END:VEVENT");
    }
}

/// Renders `year` with the stock calendar settings and standard rules.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use nongli::export::export_year;
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let doc = export_year(2024, at).unwrap();
/// assert!(doc.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
/// assert_eq!(39, doc.matches("BEGIN:VEVENT").count());
/// ```
pub fn export_year(year: i32, generated_at: DateTime<Utc>) -> Result<String, CalendarError> {
    IcsExporter::default().export_year(year, generated_at)
}

/// Output buffer writing folded, CRLF-terminated content lines.
#[derive(Default)]
struct Document {
    buf: String,
}

impl Document {
    /// Appends a content line, folding it at UTF-8 boundaries.
    fn line(&mut self, line: &str) {
        let mut width = 0;
        for c in line.chars() {
            if width + c.len_utf8() > MAX_LINE_OCTETS {
                self.buf.push_str("\r\n ");
                width = 1;
            }
            self.buf.push(c);
            width += c.len_utf8();
        }
        self.buf.push_str("\r\n");
    }

    /// Appends a property with an escaped TEXT value.
    fn text(&mut self, name: &str, value: &str) {
        self.line(&format!("{name}:{}", escape(value)));
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// Undoes line folding, for inspecting rendered documents.
#[cfg(test)]
fn unfold(doc: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in doc.split("\r\n").filter(|l| !l.is_empty()) {
        match raw.strip_prefix(' ') {
            Some(rest) => {
                if let Some(last) = lines.last_mut() {
                    last.push_str(rest);
                }
            }
            None => lines.push(raw.to_owned()),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;
    use crate::observance::{Category, ObservanceRule, Trigger};

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, 12, 30, 0).unwrap()
    }

    fn export_2024() -> String {
        export_year(2024, generated_at()).unwrap()
    }

    #[test]
    fn header() {
        let lines = unfold(&export_2024());
        assert_eq!(
            vec![
                "BEGIN:VCALENDAR",
                "VERSION:2.0",
                "PRODID:-//TaoistTemple//Calendar//ES",
                "CALSCALE:GREGORIAN",
                "METHOD:PUBLISH",
                "X-WR-CALNAME:Calendario Ritual del Templo 2024",
            ],
            lines[..6]
        );
        assert_eq!(Some(&"END:VCALENDAR".to_owned()), lines.last());
    }

    #[test]
    fn new_year_event() {
        let lines = unfold(&export_2024());
        let start = lines
            .iter()
            .position(|l| l == "UID:taoist-20240210-ceremony-r02@temple.app")
            .unwrap();
        assert_eq!(
            vec![
                "UID:taoist-20240210-ceremony-r02@temple.app",
                "DTSTAMP:20240105T123000Z",
                "DTSTART;VALUE=DATE:20240210",
                "SUMMARY:Año Nuevo Chino 大年初一",
                "DESCRIPTION:Mes Lunar 1\\, Día 1",
                "TRANSP:TRANSPARENT",
                "BEGIN:VALARM",
                "TRIGGER:-PT4H",
                "ACTION:DISPLAY",
                "DESCRIPTION:Recordatorio: Año Nuevo Chino mañana",
                "END:VALARM",
                "END:VEVENT",
            ],
            lines[start..start + 12]
        );
        assert_eq!("BEGIN:VEVENT", lines[start - 1]);
    }

    #[test]
    fn one_event_per_observance_with_distinct_uids() {
        let lines = unfold(&export_2024());
        assert_eq!(39, lines.iter().filter(|l| *l == "BEGIN:VEVENT").count());
        assert_eq!(39, lines.iter().filter(|l| *l == "END:VALARM").count());
        let uids: HashSet<_> = lines.iter().filter(|l| l.starts_with("UID:")).collect();
        assert_eq!(39, uids.len());
    }

    #[test]
    fn repeated_exports_are_identical() {
        assert_eq!(export_2024(), export_2024());
    }

    #[test]
    fn lines_are_folded_and_terminated() {
        let doc = export_2024();
        assert!(doc.ends_with("END:VCALENDAR\r\n"));
        let body = doc.strip_suffix("\r\n").unwrap();
        for line in body.split("\r\n") {
            assert!(line.len() <= MAX_LINE_OCTETS, "{line:?}");
            assert!(!line.contains('\n'));
        }

        // The SHI TSUN commemoration has the longest summary in the table.
        let summary = unfold(&doc)
            .into_iter()
            .find(|l| l.starts_with("SUMMARY:Conmemoración"))
            .unwrap();
        assert_eq!(
            "SUMMARY:Conmemoración de Fallecimiento de Maestro SHI TSUN U KO SHOU 追念先師圓寂週年之恩 五叩首",
            summary
        );
        assert!(doc.contains("\r\n "));
    }

    #[test]
    fn leap_month_description() {
        let doc = export_year(2023, generated_at()).unwrap();
        let lines = unfold(&doc);
        // 2023-03-22 is the first day of the leap second month.
        let start = lines
            .iter()
            .position(|l| l == "DTSTART;VALUE=DATE:20230322")
            .unwrap();
        assert_eq!("SUMMARY:Luna Nueva 初一", lines[start + 1]);
        assert_eq!(
            "DESCRIPTION:Mes Lunar 2 (intercalar)\\, Día 1",
            lines[start + 2]
        );
    }

    #[test]
    fn configured_calendar() {
        let calendar = CalendarConfig {
            name: "Templo; Norte".to_owned(),
            uid_prefix: "norte".to_owned(),
            uid_domain: "example.org".to_owned(),
            alarm_lead_hours: 2,
            ..CalendarConfig::default()
        };
        let rules = RuleSet::with_extra(vec![ObservanceRule {
            trigger: Trigger::Fixed { month: 6, day: 7 },
            title: "Limpieza, Altar".into(),
            local_title: None,
            is_major: false,
            category: Category::Other,
        }]);
        let doc = IcsExporter::new(calendar, rules)
            .export_year(2024, generated_at())
            .unwrap();
        let lines = unfold(&doc);
        assert!(lines.contains(&"X-WR-CALNAME:Templo\\; Norte 2024".to_owned()));
        assert!(lines.contains(&"TRIGGER:-PT2H".to_owned()));
        assert!(!lines.contains(&"TRIGGER:-PT4H".to_owned()));
        assert!(lines.contains(&"SUMMARY:Limpieza\\, Altar".to_owned()));
        assert!(lines.contains(&"UID:norte-20240712-other-x00@example.org".to_owned()));
        assert_eq!(40, lines.iter().filter(|l| *l == "BEGIN:VEVENT").count());
    }

    #[test]
    fn first_supported_year_starts_at_epoch() {
        let lines = unfold(&export_year(1900, generated_at()).unwrap());
        let first = lines.iter().find(|l| l.starts_with("DTSTART")).unwrap();
        assert_eq!("DTSTART;VALUE=DATE:19000131", first);
    }

    #[test]
    fn year_out_of_range() {
        assert_eq!(
            Err(CalendarError::YearOutOfRange { year: 2101 }),
            export_year(2101, generated_at())
        );
    }

    #[test]
    fn escaping() {
        assert_eq!("a\\,b\\;c\\\\d\\ne", escape("a,b;c\\d\r\ne"));
    }

    #[test]
    fn folding_respects_char_boundaries() {
        let mut doc = Document::default();
        doc.line(&format!("X:{}", "漢".repeat(40)));
        let lines: Vec<_> = doc.buf.split("\r\n").filter(|l| !l.is_empty()).collect();
        // "X:" plus 24 three-octet chars fill 74 octets; the 25th would overflow.
        assert_eq!(2 + 24 * 3, lines[0].len());
        assert!(lines[1].starts_with(' '));
        assert!(lines.iter().all(|l| l.len() <= MAX_LINE_OCTETS));
        assert_eq!(format!("X:{}", "漢".repeat(40)), unfold(&doc.buf)[0]);
    }
}

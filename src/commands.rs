//! Subcommand implementations.

use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use nongli::almanac::{self, DayEvents};
use nongli::chinese::{LunarDate, fmt};
use nongli::export::IcsExporter;
use nongli::export::reminder::build_reminder_schedule_now;
use nongli::observance::DayMarker;
use nongli::{Config, Date};

use crate::cli::{ConvertArgs, EventsArgs, IcsArgs, RemindersArgs};

const SPANISH_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Print the lunar date and observances of one Gregorian day.
pub fn convert(args: ConvertArgs, config: &Config) -> Result<()> {
    let _cmd = info_span!("convert").entered();
    let date: Date = args.date.parse()?;
    let lunar = LunarDate::from_date(date)
        .with_context(|| format!("failed to convert {date}"))?;
    let observances = config.rule_set()?.resolve(&lunar);

    let mut out = io::stdout().lock();
    writeln!(out, "{date}  {lunar}  {}年", lunar.year_name())?;
    writeln!(out, "{}, Día {}", fmt::month_es(lunar.month()), lunar.day())?;
    for observance in &observances {
        writeln!(out, "  {} {}", bullet(observance.is_major), observance.summary())?;
    }
    Ok(())
}

/// Print a year of observances grouped by Gregorian month.
pub fn events(args: EventsArgs, config: &Config) -> Result<()> {
    let _cmd = info_span!("events", year = args.year).entered();
    let days = almanac::year_events(args.year, &config.rule_set()?)?;
    info!(days = days.len(), "year walked");

    let mut out = io::stdout().lock();
    for (month, days) in almanac::by_month(days) {
        if args.month.is_some_and(|m| m != month) {
            continue;
        }
        let name = usize::try_from(month - 1)
            .ok()
            .and_then(|i| SPANISH_MONTHS.get(i))
            .context("month out of range")?;
        writeln!(out, "{name} {}", args.year)?;
        for day in &days {
            write_day(&mut out, day)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_day(out: &mut impl Write, day: &DayEvents) -> io::Result<()> {
    let marker = match day.marker() {
        Some(DayMarker::Major) => '*',
        Some(DayMarker::MoonPhase) => 'o',
        Some(DayMarker::Other) | None => ' ',
    };
    let (_, _, d) = day.date.gregorian();
    writeln!(out, "{marker} {d:>2}  {}", fmt::label(&day.lunar))?;
    for observance in &day.observances {
        writeln!(out, "       {} {}", bullet(observance.is_major), observance.summary())?;
    }
    Ok(())
}

fn bullet(major: bool) -> char {
    if major { '*' } else { '-' }
}

/// Write the iCalendar document of a year.
pub fn ics(args: IcsArgs, config: &Config) -> Result<()> {
    let _cmd = info_span!("ics", year = args.year).entered();
    let exporter = IcsExporter::from_config(config)?;
    let doc = exporter.export_year_now(args.year)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &doc)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), octets = doc.len(), "calendar written");
        }
        None => io::stdout().lock().write_all(doc.as_bytes())?,
    }
    Ok(())
}

/// Print the pending reminders of a year as JSON.
pub fn reminders(args: RemindersArgs, config: &Config) -> Result<()> {
    let _cmd = info_span!("reminders", year = args.year).entered();
    let reminders = build_reminder_schedule_now(args.year, config)?;
    info!(count = reminders.len(), "reminders scheduled");

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &reminders).context("failed to serialize reminders")?;
    writeln!(out)?;
    Ok(())
}

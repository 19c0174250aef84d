use crate::calendar::{month_title, CalendarCursor, MAX_YEAR, MIN_YEAR, WEEKDAY_LABELS};
use crate::config::AppConfig;
use crate::model::NoteStore;
use crate::ui;
use anyhow::{anyhow, bail, Result};
use chrono::{Datelike, Local, NaiveDate};
use tracing::info;

pub fn tui(config: &AppConfig, month: Option<&str>) -> Result<()> {
    let today = Local::now().date_naive();
    let start = start_date(month, today)?;
    let store = NoteStore::with_capacity(config.max_notes_per_day);
    info!(%start, capacity = store.capacity(), "opening calendar");
    ui::run(store, start, today)
}

pub fn grid(month: Option<&str>) -> Result<()> {
    let today = Local::now().date_naive();
    let start = start_date(month, today)?;
    print!("{}", format_month(start, today));
    Ok(())
}

/// Today when no month is requested or it is the current one, otherwise
/// the first of the requested month.
fn start_date(month: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let raw = match month {
        Some(r) if !r.trim().is_empty() => r.trim(),
        _ => return Ok(today),
    };
    let first = parse_month(raw)?;
    if first.year() == today.year() && first.month() == today.month() {
        Ok(today)
    } else {
        Ok(first)
    }
}

fn parse_month(raw: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid month (use YYYY-MM): {}", raw))?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        bail!("year out of range ({}..={}): {}", MIN_YEAR, MAX_YEAR, raw);
    }
    Ok(date)
}

/// `cal`-style month grid. Days from neighbouring months are left blank and
/// today carries a `*`.
fn format_month(reference: NaiveDate, today: NaiveDate) -> String {
    let cursor = CalendarCursor::new(reference);
    let mut out = String::new();
    out.push_str(format!("{:^20}", month_title(reference)).trim_end());
    out.push('\n');
    let header: Vec<&str> = WEEKDAY_LABELS.iter().map(|label| &label[..2]).collect();
    out.push_str(&header.join(" "));
    out.push('\n');
    for week in cursor.days().chunks(7) {
        let line: String = week
            .iter()
            .map(|date| {
                if !cursor.in_month(*date) {
                    "   ".to_string()
                } else if *date == today {
                    format!("{:>2}*", date.day())
                } else {
                    format!("{:>2} ", date.day())
                }
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

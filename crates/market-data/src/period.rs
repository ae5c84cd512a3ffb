//! Calendar helpers shared by providers and the synchronizer.

use chrono::{Datelike, Duration, Months, NaiveDate};

/// First day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `date` shifted back by `months` calendar months, clamped to the month's last day.
pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

/// Splits `[from, to]` into consecutive inclusive windows of at most `chunk_days` days.
///
/// An inverted range yields a single `(from, to)` window; callers validate first.
pub fn day_chunks(from: NaiveDate, to: NaiveDate, chunk_days: i64) -> Vec<(NaiveDate, NaiveDate)> {
    let chunk = Duration::days(chunk_days.max(1));
    let mut chunks = Vec::new();
    let mut start = from;
    while start + chunk < to {
        let marker = start + chunk;
        chunks.push((start, marker - Duration::days(1)));
        start = marker;
    }
    chunks.push((start, to));
    chunks
}

/// Every `(year, month)` from the month of `from` through the month of `to`, inclusive.
pub fn months_in_range(from: NaiveDate, to: NaiveDate) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let end = start_of_month(to);
    let mut current = start_of_month(from);
    while current <= end {
        months.push((current.year(), current.month()));
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}

//! Calendar helpers: month arithmetic and the local wall clock.

use anyhow::Result;
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Resolve the current local wall-clock time in an IANA timezone like
/// "America/Sao_Paulo".
pub fn local_now(tz: &str) -> Result<NaiveDateTime> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(Utc::now().with_timezone(&tz).naive_local())
}

/// `date` advanced by `months` calendar months. A day that does not exist in
/// the target month is clamped to that month's last day (Jan 31 + 1 → Feb 29
/// in a leap year).
///
/// Recurring series call this with the anchor and the full month count,
/// never with the previous occurrence, so a clamp never carries over:
/// Jan 31 gives Feb 29, then Mar 31, not Mar 29.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// (year, month) ordering key.
pub fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    add_months_clamped(first, 1)?.pred_opt()
}

/// The given day in (year, month), clamped to the month's length.
pub fn date_with_day_clamped(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    last.with_day(day.clamp(1, last.day()))
}

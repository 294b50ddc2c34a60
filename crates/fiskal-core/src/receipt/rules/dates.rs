//! Receipt timestamp assembly.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Build a timestamp from the `dd.mm.yy hh:mm` parts of a receipt line.
///
/// Two-digit years always fall into the 2000s.
pub fn receipt_datetime(day: &str, month: &str, year: &str, hour: &str, minute: &str) -> Option<NaiveDateTime> {
    let year: i32 = year.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(2000 + year, month.parse().ok()?, day.parse().ok()?)?;
    let time = NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)?;
    Some(date.and_time(time))
}

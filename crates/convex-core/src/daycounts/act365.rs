//! Actual/365 Fixed day count convention.

use chrono::{DateTime, TimeZone};

use super::DayCount;
use crate::types::Date;

/// Actual/365 Fixed day count convention.
///
/// The day count is the actual number of days between dates.
/// The year basis is always 365 days (ignoring leap years).
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{365}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 365.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Returns the ACT/365F time in years from `from` to `to`.
///
/// `to` is first moved into `from`'s time zone, then the calendar days
/// between the two local dates are divided by 365. The result is negative
/// when `to` precedes `from`.
pub fn time_between<Tz1, Tz2>(from: &DateTime<Tz1>, to: &DateTime<Tz2>) -> f64
where
    Tz1: TimeZone,
    Tz2: TimeZone,
{
    let rebased = to.with_timezone(&from.timezone());
    let start = Date::from(from.date_naive());
    let end = Date::from(rebased.date_naive());

    Act365Fixed.year_fraction(start, end)
}

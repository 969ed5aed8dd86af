//! Actual/360 day count convention.

use super::DayCount;
use crate::types::Date;

/// Actual/360 day count convention.
///
/// The day count is the actual number of days between dates.
/// The year basis is always 360 days.
///
/// # Usage
///
/// - CDS premium leg accrual (standard ISDA contracts)
/// - Money market instruments
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{360}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_act360_basic() {
        let dc = Act360;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 4, 1).unwrap();

        // Jan has 31, Feb has 28, Mar has 31 = 90 days
        assert_eq!(dc.day_count(start, end), 90);
        assert_relative_eq!(dc.year_fraction(start, end), 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_act360_quarterly_cds_period() {
        let dc = Act360;
        let start = Date::from_ymd(2024, 12, 20).unwrap();
        let end = Date::from_ymd(2025, 3, 20).unwrap();

        assert_eq!(dc.day_count(start, end), 90);
        assert_eq!(dc.name(), "ACT/360");
    }

    #[test]
    fn test_act360_negative() {
        let dc = Act360;
        let start = Date::from_ymd(2025, 4, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 1).unwrap();

        assert_relative_eq!(dc.year_fraction(start, end), -0.25, epsilon = 1e-15);
    }
}

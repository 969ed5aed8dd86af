//! Day count conventions.
//!
//! Day count conventions determine how accrued premium is calculated
//! by specifying how to count days between two dates and the year basis.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360 - CDS premium accrual
//! - [`Act365Fixed`]: Actual/365 Fixed - the pricer's time axis
//!
//! # Time Axis
//!
//! Every date the pricer sees is turned into a time in years from the
//! pricing date with ACT/365F via [`time_between`]. Curve knots and
//! schedule boundaries built through the same function land on exactly the
//! same `f64` when they denote the same date.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use convex_core::daycounts::time_between;
//!
//! let pricing = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
//! let settle = Utc.with_ymd_and_hms(2025, 1, 4, 0, 0, 0).unwrap();
//!
//! assert_eq!(time_between(&pricing, &settle), 3.0 / 365.0);
//! assert_eq!(time_between(&settle, &pricing), -3.0 / 365.0);
//! ```

mod act360;
mod act365;

pub use act360::Act360;
pub use act365::{time_between, Act365Fixed};

use serde::{Deserialize, Serialize};

use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention (e.g. "ACT/360").
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end` precedes `start`.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Calculates the day count between two dates.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Enumeration of the supported day count conventions.
///
/// Serialisable selector used by contract definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360 - CDS premium leg
    #[default]
    Act360,

    /// Actual/365 Fixed
    Act365Fixed,
}

impl DayCountConvention {
    /// Calculates the year fraction between two dates under this convention.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
        }
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
        }
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convention_dispatch() {
        let start = Date::from_ymd(2025, 3, 20).unwrap();
        let end = Date::from_ymd(2025, 6, 20).unwrap();

        let implementations: [(DayCountConvention, &dyn DayCount); 2] = [
            (DayCountConvention::Act360, &Act360),
            (DayCountConvention::Act365Fixed, &Act365Fixed),
        ];
        for (convention, day_count) in implementations {
            assert_eq!(day_count.name(), convention.name());
            assert_eq!(
                day_count.year_fraction(start, end),
                convention.year_fraction(start, end)
            );
            assert_eq!(day_count.day_count(start, end), 92);
        }
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(DayCountConvention::Act360.to_string(), "ACT/360");
        let json = serde_json::to_string(&DayCountConvention::Act365Fixed).unwrap();
        let parsed: DayCountConvention = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, DayCountConvention::Act365Fixed);
    }
}

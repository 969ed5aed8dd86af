//! ISDA premium schedule generation.

use serde::{Deserialize, Serialize};

use convex_core::calendars::{BusinessDayConvention, Calendar};
use convex_core::daycounts::DayCountConvention;
use convex_core::types::{Date, Frequency};

use crate::error::{CdsError, CdsResult};

/// One dated premium period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdsPremiumPeriod {
    /// First day of accrual.
    pub accrual_start: Date,
    /// Accrual end (exclusive of the day itself unless protect start).
    pub accrual_end: Date,
    /// Premium payment date.
    pub payment_date: Date,
}

/// The premium leg schedule of a CDS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdsPremiumSchedule {
    periods: Vec<CdsPremiumPeriod>,
    day_count: DayCountConvention,
}

impl CdsPremiumSchedule {
    /// Generates an ISDA-style schedule.
    ///
    /// Roll dates step back from `maturity` by the frequency's months, so any
    /// irregular period is a short front stub starting at `start`. Accrual
    /// boundaries and payment dates are adjusted with `convention`, except
    /// the first accrual start and the last accrual end, which is the
    /// unadjusted maturity plus one day when `protect_start` is set.
    pub fn isda(
        start: Date,
        maturity: Date,
        frequency: Frequency,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        day_count: DayCountConvention,
        protect_start: bool,
    ) -> CdsResult<Self> {
        if maturity <= start {
            return Err(CdsError::invalid_input(format!(
                "maturity {maturity} must be after start {start}"
            )));
        }

        let months = frequency.months_per_period() as i32;
        let mut rolls = vec![maturity];
        for k in 1.. {
            let roll = maturity.add_months(-months * k)?;
            if roll <= start {
                break;
            }
            rolls.push(roll);
        }
        rolls.push(start);
        rolls.reverse();

        let last = rolls.len() - 2;
        let periods = rolls
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let accrual_start = if i == 0 {
                    w[0]
                } else {
                    calendar.adjust(w[0], convention)
                };
                let (accrual_end, payment_date) = if i == last {
                    let end = if protect_start { w[1].add_days(1) } else { w[1] };
                    (end, calendar.adjust(w[1], convention))
                } else {
                    let adjusted = calendar.adjust(w[1], convention);
                    (adjusted, adjusted)
                };
                CdsPremiumPeriod {
                    accrual_start,
                    accrual_end,
                    payment_date,
                }
            })
            .collect();

        Ok(Self { periods, day_count })
    }

    /// Returns the periods in order.
    pub fn periods(&self) -> &[CdsPremiumPeriod] {
        &self.periods
    }

    /// Returns the premium day count.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Day count fraction of a period.
    pub fn year_fraction(&self, period: &CdsPremiumPeriod) -> f64 {
        self.day_count
            .year_fraction(period.accrual_start, period.accrual_end)
    }
}

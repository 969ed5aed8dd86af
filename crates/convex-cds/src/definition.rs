//! Dated CDS trade definition.

use serde::{Deserialize, Serialize};

use convex_core::calendars::{BusinessDayConvention, WeekendCalendar};
use convex_core::daycounts::{Act365Fixed, DayCount, DayCountConvention};
use convex_core::types::{Date, Frequency};

use crate::contract::{CdsContract, CdsCoupon};
use crate::error::{CdsError, CdsResult};
use crate::schedule::CdsPremiumSchedule;

/// A CDS described by calendar dates.
///
/// Convert to a [`CdsContract`] with [`to_contract`](Self::to_contract) to
/// price it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdsDefinition {
    /// Protection start date.
    pub start_date: Date,
    /// Scheduled termination date.
    pub maturity_date: Date,
    /// Premium leg schedule.
    pub premium: CdsPremiumSchedule,
    /// Notional amount.
    pub notional: f64,
    /// Running spread paid on the premium leg.
    pub spread: f64,
    /// Recovery rate in [0, 1].
    pub recovery_rate: f64,
    /// Accrued premium is paid on default.
    pub accrual_on_default: bool,
    /// Protection pays at default rather than at maturity.
    pub pay_on_default: bool,
    /// Protection is observed at the start of each day.
    pub protect_start: bool,
}

impl CdsDefinition {
    /// Standard ISDA terms: quarterly ACT/360 premiums on a weekend
    /// calendar with Following adjustment, protect start, accrual on
    /// default and pay on default.
    pub fn isda_standard(
        start_date: Date,
        maturity_date: Date,
        notional: f64,
        spread: f64,
        recovery_rate: f64,
    ) -> CdsResult<Self> {
        let premium = CdsPremiumSchedule::isda(
            start_date,
            maturity_date,
            Frequency::Quarterly,
            &WeekendCalendar,
            BusinessDayConvention::Following,
            DayCountConvention::Act360,
            true,
        )?;

        Ok(Self {
            start_date,
            maturity_date,
            premium,
            notional,
            spread,
            recovery_rate,
            accrual_on_default: true,
            pay_on_default: true,
            protect_start: true,
        })
    }

    /// Converts the trade to times (ACT/365F from `pricing_date`).
    ///
    /// Periods whose accrual ends on or before `stepin_date` have been paid
    /// and are dropped. The accrued premium runs from the start of the first
    /// remaining period to the step-in date.
    ///
    /// # Errors
    ///
    /// Returns an error if no premium period remains after step-in or the
    /// resulting contract fails validation.
    pub fn to_contract(&self, pricing_date: Date, stepin_date: Date) -> CdsResult<CdsContract> {
        let time = |date: Date| Act365Fixed.year_fraction(pricing_date, date);

        let remaining: Vec<_> = self
            .premium
            .periods()
            .iter()
            .filter(|p| p.accrual_end > stepin_date)
            .collect();

        let current = remaining.first().ok_or_else(|| {
            CdsError::invalid_input(format!(
                "no premium periods remain after step-in date {stepin_date}"
            ))
        })?;

        let accrued_year_fraction = if stepin_date > current.accrual_start {
            self.premium
                .day_count()
                .year_fraction(current.accrual_start, stepin_date)
        } else {
            0.0
        };

        let coupons = remaining
            .iter()
            .map(|p| {
                CdsCoupon::new(
                    time(p.accrual_start),
                    time(p.accrual_end),
                    time(p.payment_date),
                    self.spread,
                    self.premium.year_fraction(p),
                )
            })
            .collect();

        CdsContract::builder()
            .coupons(coupons)
            .start_time(time(self.start_date))
            .maturity(time(self.maturity_date))
            .notional(self.notional)
            .recovery_rate(self.recovery_rate)
            .protect_start(self.protect_start)
            .accrual_on_default(self.accrual_on_default)
            .pay_on_default(self.pay_on_default)
            .accrued_year_fraction(accrued_year_fraction)
            .accrued_interest(self.notional * self.spread * accrued_year_fraction)
            .build()
    }
}

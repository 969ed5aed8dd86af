//! Time-based CDS contract.
//!
//! A [`CdsContract`] is what the pricer consumes: every date has already been
//! converted to an ACT/365F time in years from the pricing date, so past
//! dates are negative.

use serde::{Deserialize, Serialize};

use crate::error::{CdsError, CdsResult};

/// One premium period of a CDS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CdsCoupon {
    /// Accrual start time.
    pub accrual_start_time: f64,
    /// Accrual end time.
    pub accrual_end_time: f64,
    /// Payment time.
    pub payment_time: f64,
    /// Running coupon rate (e.g. 0.01 for 100bp).
    pub fixed_rate: f64,
    /// Premium day count fraction of the period.
    pub payment_year_fraction: f64,
}

impl CdsCoupon {
    /// Creates a coupon.
    pub fn new(
        accrual_start_time: f64,
        accrual_end_time: f64,
        payment_time: f64,
        fixed_rate: f64,
        payment_year_fraction: f64,
    ) -> Self {
        Self {
            accrual_start_time,
            accrual_end_time,
            payment_time,
            fixed_rate,
            payment_year_fraction,
        }
    }

    /// Premium paid for the full period per unit notional.
    pub fn amount(&self) -> f64 {
        self.fixed_rate * self.payment_year_fraction
    }
}

/// A credit default swap expressed in times from the pricing date.
///
/// Construct with [`CdsContract::builder`] or
/// [`CdsDefinition::to_contract`](crate::CdsDefinition::to_contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdsContract {
    coupons: Vec<CdsCoupon>,
    start_time: f64,
    maturity: f64,
    notional: f64,
    recovery_rate: f64,
    protect_start: bool,
    accrual_on_default: bool,
    pay_on_default: bool,
    accrued_year_fraction: f64,
    accrued_interest: f64,
}

impl CdsContract {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> CdsContractBuilder {
        CdsContractBuilder::default()
    }

    /// Premium periods, ordered by accrual end.
    pub fn coupons(&self) -> &[CdsCoupon] {
        &self.coupons
    }

    /// Protection start time.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Maturity time.
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Notional amount.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Recovery rate in [0, 1].
    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    /// True if protection is observed at the start of each day.
    pub fn protect_start(&self) -> bool {
        self.protect_start
    }

    /// True if accrued premium is paid on default.
    pub fn accrual_on_default(&self) -> bool {
        self.accrual_on_default
    }

    /// True if the protection payoff is made at default rather than at maturity.
    pub fn pay_on_default(&self) -> bool {
        self.pay_on_default
    }

    /// Premium day count fraction accrued in the current period at step-in.
    pub fn accrued_year_fraction(&self) -> f64 {
        self.accrued_year_fraction
    }

    /// Accrued premium at step-in, in notional units.
    pub fn accrued_interest(&self) -> f64 {
        self.accrued_interest
    }

    /// Boundary offset applied when protection starts at the beginning of the day.
    pub fn protect_start_offset(&self) -> f64 {
        if self.protect_start {
            crate::ONE_DAY_ACT_365F
        } else {
            0.0
        }
    }

    /// Builds the unit-notional CDS paying `flat_spread` on this contract's
    /// schedule, used to calibrate a flat hazard rate to a quoted spread.
    ///
    /// All three ISDA flags are set and accrued interest is recomputed at
    /// the flat spread.
    #[must_use]
    pub fn zero_cds(&self, flat_spread: f64) -> Self {
        let coupons = self
            .coupons
            .iter()
            .map(|c| CdsCoupon {
                fixed_rate: flat_spread,
                ..*c
            })
            .collect();

        Self {
            coupons,
            start_time: self.start_time,
            maturity: self.maturity,
            notional: 1.0,
            recovery_rate: self.recovery_rate,
            protect_start: true,
            accrual_on_default: true,
            pay_on_default: true,
            accrued_year_fraction: self.accrued_year_fraction,
            accrued_interest: flat_spread * self.accrued_year_fraction,
        }
    }
}

/// Builder for [`CdsContract`].
#[derive(Debug, Clone, Default)]
pub struct CdsContractBuilder {
    coupons: Option<Vec<CdsCoupon>>,
    start_time: Option<f64>,
    maturity: Option<f64>,
    notional: Option<f64>,
    recovery_rate: Option<f64>,
    protect_start: Option<bool>,
    accrual_on_default: Option<bool>,
    pay_on_default: Option<bool>,
    accrued_year_fraction: f64,
    accrued_interest: Option<f64>,
}

impl CdsContractBuilder {
    /// Sets the premium periods.
    #[must_use]
    pub fn coupons(mut self, coupons: Vec<CdsCoupon>) -> Self {
        self.coupons = Some(coupons);
        self
    }

    /// Sets the start time. Defaults to the first coupon's accrual start.
    #[must_use]
    pub fn start_time(mut self, start_time: f64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Sets the maturity time.
    #[must_use]
    pub fn maturity(mut self, maturity: f64) -> Self {
        self.maturity = Some(maturity);
        self
    }

    /// Sets the notional. Defaults to 1.
    #[must_use]
    pub fn notional(mut self, notional: f64) -> Self {
        self.notional = Some(notional);
        self
    }

    /// Sets the recovery rate.
    #[must_use]
    pub fn recovery_rate(mut self, recovery_rate: f64) -> Self {
        self.recovery_rate = Some(recovery_rate);
        self
    }

    /// Sets the protect start flag. Defaults to true.
    #[must_use]
    pub fn protect_start(mut self, protect_start: bool) -> Self {
        self.protect_start = Some(protect_start);
        self
    }

    /// Sets the accrual on default flag. Defaults to true.
    #[must_use]
    pub fn accrual_on_default(mut self, accrual_on_default: bool) -> Self {
        self.accrual_on_default = Some(accrual_on_default);
        self
    }

    /// Sets the pay on default flag. Defaults to true.
    #[must_use]
    pub fn pay_on_default(mut self, pay_on_default: bool) -> Self {
        self.pay_on_default = Some(pay_on_default);
        self
    }

    /// Sets the accrued premium day count fraction at step-in.
    #[must_use]
    pub fn accrued_year_fraction(mut self, accrued_year_fraction: f64) -> Self {
        self.accrued_year_fraction = accrued_year_fraction;
        self
    }

    /// Sets the accrued interest. Defaults to notional x first coupon rate x
    /// accrued year fraction.
    #[must_use]
    pub fn accrued_interest(mut self, accrued_interest: f64) -> Self {
        self.accrued_interest = Some(accrued_interest);
        self
    }

    /// Builds the contract.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing, the schedule is
    /// empty or not ordered, or a numeric field is out of range.
    pub fn build(self) -> CdsResult<CdsContract> {
        let coupons = self
            .coupons
            .ok_or_else(|| CdsError::missing_field("coupons"))?;
        let maturity = self
            .maturity
            .ok_or_else(|| CdsError::missing_field("maturity"))?;
        let recovery_rate = self
            .recovery_rate
            .ok_or_else(|| CdsError::missing_field("recovery_rate"))?;

        let first = coupons
            .first()
            .ok_or_else(|| CdsError::invalid_input("CDS has no premium periods"))?;

        if let Some(i) = coupons
            .windows(2)
            .position(|w| w[1].accrual_end_time <= w[0].accrual_end_time)
        {
            return Err(CdsError::invalid_input(format!(
                "accrual end times must be strictly increasing (coupon {})",
                i + 1
            )));
        }
        if coupons.iter().any(|c| {
            ![
                c.accrual_start_time,
                c.accrual_end_time,
                c.payment_time,
                c.fixed_rate,
                c.payment_year_fraction,
            ]
            .iter()
            .all(|x| x.is_finite())
        }) {
            return Err(CdsError::invalid_input("coupon fields must be finite"));
        }
        if !(0.0..=1.0).contains(&recovery_rate) {
            return Err(CdsError::invalid_input(format!(
                "recovery rate {recovery_rate} outside [0, 1]"
            )));
        }

        let start_time = self.start_time.unwrap_or(first.accrual_start_time);
        let notional = self.notional.unwrap_or(1.0);
        if !(maturity.is_finite() && start_time.is_finite() && notional.is_finite()) {
            return Err(CdsError::invalid_input(
                "maturity, start time and notional must be finite",
            ));
        }

        let accrued_interest = self
            .accrued_interest
            .unwrap_or(notional * first.fixed_rate * self.accrued_year_fraction);

        Ok(CdsContract {
            start_time,
            maturity,
            notional,
            recovery_rate,
            protect_start: self.protect_start.unwrap_or(true),
            accrual_on_default: self.accrual_on_default.unwrap_or(true),
            pay_on_default: self.pay_on_default.unwrap_or(true),
            accrued_year_fraction: self.accrued_year_fraction,
            accrued_interest,
            coupons,
        })
    }
}

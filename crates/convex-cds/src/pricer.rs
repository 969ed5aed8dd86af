//! ISDA approximate CDS pricer.
//!
//! [`IsdaApproxPricer`] values a CDS as contingent leg minus fee leg, both
//! integrated over timelines built once per call in a [`ValuationContext`].
//! A flat hazard rate can be calibrated to a quoted spread first, in which
//! case the timelines are built in calibration mode with the contract
//! maturity standing in for the hazard curve's knots.

use chrono::{DateTime, TimeZone};
use tracing::{debug, trace, warn};

use convex_core::daycounts::time_between;
use convex_curves::{IsdaCurve, TermStructure};
use convex_math::solvers::{brent, SolverConfig};

use crate::config::IsdaPricerConfig;
use crate::contingent_leg::value_contingent_leg;
use crate::contract::CdsContract;
use crate::error::{CdsError, CdsResult};
use crate::fee_leg::value_fee_leg;
use crate::timeline::{build_payment_timeline, build_timeline, HazardKnots, Timeline};
use crate::PRICING_TIME;

/// Name given to curves produced by spread calibration.
pub const CALIBRATED_CURVE_NAME: &str = "HAZARD_RATE_CURVE";

/// Timelines and discount factors shared by every valuation of one contract
/// on one set of dates.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationContext {
    payment_timeline: Timeline,
    accrual_timeline: Timeline,
    contingent_timeline: Timeline,
    stepin_time: f64,
    stepin_discount_factor: f64,
    settlement_discount_factor: f64,
}

impl ValuationContext {
    /// Builds the context for `cds` priced on `pricing_date`.
    ///
    /// The step-in time carries the protect-start offset, and protection
    /// starts at the latest of the contract start, the offset step-in and
    /// the offset pricing time.
    pub fn new<Tz: TimeZone>(
        cds: &CdsContract,
        discount_curve: &dyn TermStructure,
        hazard: HazardKnots<'_>,
        pricing_date: &DateTime<Tz>,
        stepin_date: &DateTime<Tz>,
        settlement_date: &DateTime<Tz>,
    ) -> Self {
        let offset = cds.protect_start_offset();
        let settlement_time = time_between(pricing_date, settlement_date);
        let stepin_time = time_between(pricing_date, stepin_date) - offset;
        let maturity_time = cds.maturity() + offset;
        let protection_start = cds.start_time().max(stepin_time).max(PRICING_TIME - offset);

        let payment_timeline = build_payment_timeline(cds, discount_curve);
        let accrual_timeline =
            build_timeline(cds, discount_curve, hazard, cds.start_time(), maturity_time, true);
        let contingent_timeline =
            build_timeline(cds, discount_curve, hazard, protection_start, cds.maturity(), false);

        trace!(
            payment_points = payment_timeline.len(),
            accrual_points = accrual_timeline.len(),
            contingent_points = contingent_timeline.len(),
            "Built valuation timelines"
        );

        let stepin_discount_factor = discount_curve.value_at(stepin_time.max(PRICING_TIME));

        Self {
            payment_timeline,
            accrual_timeline,
            contingent_timeline,
            stepin_time,
            stepin_discount_factor,
            settlement_discount_factor: discount_curve.value_at(settlement_time),
        }
    }

    /// One point per coupon payment.
    pub fn payment_timeline(&self) -> &Timeline {
        &self.payment_timeline
    }

    /// Fine timeline for the fee leg's accrual on default.
    pub fn accrual_timeline(&self) -> &Timeline {
        &self.accrual_timeline
    }

    /// Timeline over the protection period.
    pub fn contingent_timeline(&self) -> &Timeline {
        &self.contingent_timeline
    }

    /// Step-in time less the protect-start offset.
    pub fn stepin_time(&self) -> f64 {
        self.stepin_time
    }

    /// Discount factor at step-in (1 at or before the pricing time).
    pub fn stepin_discount_factor(&self) -> f64 {
        self.stepin_discount_factor
    }

    /// Discount factor to the settlement date.
    pub fn settlement_discount_factor(&self) -> f64 {
        self.settlement_discount_factor
    }
}

/// Single-knot flat hazard rate used inside the calibration objective.
struct FlatHazardRate {
    rate: f64,
    knots: [f64; 1],
}

impl TermStructure for FlatHazardRate {
    fn value_at(&self, t: f64) -> f64 {
        (-self.rate * t).exp()
    }

    fn knot_times(&self) -> &[f64] {
        &self.knots
    }
}

/// ISDA standard model CDS pricer.
///
/// Stateless apart from its configuration, so one instance can be shared
/// across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IsdaApproxPricer {
    config: IsdaPricerConfig,
}

impl IsdaApproxPricer {
    /// Creates a pricer with the given configuration.
    pub fn new(config: IsdaPricerConfig) -> CdsResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IsdaPricerConfig {
        &self.config
    }

    /// Up-front charge of `cds` given discount and hazard curves.
    ///
    /// Returns the dirty price, or the clean price when `clean_price` is set,
    /// in notional units and forward-valued to the settlement date.
    pub fn calculate_upfront_charge<Tz: TimeZone>(
        &self,
        cds: &CdsContract,
        discount_curve: &dyn TermStructure,
        hazard_curve: &dyn TermStructure,
        pricing_date: &DateTime<Tz>,
        stepin_date: &DateTime<Tz>,
        settlement_date: &DateTime<Tz>,
        clean_price: bool,
    ) -> CdsResult<f64> {
        let context = ValuationContext::new(
            cds,
            discount_curve,
            HazardKnots::Curve(hazard_curve),
            pricing_date,
            stepin_date,
            settlement_date,
        );
        self.value_cds(cds, hazard_curve, &context, clean_price)
    }

    /// Up-front charge of `cds` with a flat hazard rate calibrated so that a
    /// zero CDS paying `flat_spread` on the same schedule has zero clean price.
    pub fn calculate_upfront_charge_from_spread<Tz: TimeZone>(
        &self,
        cds: &CdsContract,
        discount_curve: &dyn TermStructure,
        flat_spread: f64,
        pricing_date: &DateTime<Tz>,
        stepin_date: &DateTime<Tz>,
        settlement_date: &DateTime<Tz>,
        clean_price: bool,
    ) -> CdsResult<f64> {
        let context = ValuationContext::new(
            cds,
            discount_curve,
            HazardKnots::MaturityOnly,
            pricing_date,
            stepin_date,
            settlement_date,
        );

        let hazard_rate = self.solve_hazard_rate(cds, flat_spread, &context)?;
        let hazard_curve = IsdaCurve::flat(CALIBRATED_CURVE_NAME, cds.maturity(), hazard_rate)?;

        self.value_cds(cds, &hazard_curve, &context, clean_price)
    }

    /// Calibrates the flat hazard rate implied by `flat_spread`.
    pub fn calibrate_hazard_rate<Tz: TimeZone>(
        &self,
        cds: &CdsContract,
        discount_curve: &dyn TermStructure,
        flat_spread: f64,
        pricing_date: &DateTime<Tz>,
        stepin_date: &DateTime<Tz>,
        settlement_date: &DateTime<Tz>,
    ) -> CdsResult<f64> {
        let context = ValuationContext::new(
            cds,
            discount_curve,
            HazardKnots::MaturityOnly,
            pricing_date,
            stepin_date,
            settlement_date,
        );
        self.solve_hazard_rate(cds, flat_spread, &context)
    }

    /// Values `cds` over prebuilt timelines.
    ///
    /// The dirty price is `(contingent - fee) * notional`; the clean price
    /// adds back the accrued interest.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the step-in time precedes the pricing time,
    /// or if `context` was built for a contract with a different number of
    /// coupons.
    pub fn value_cds(
        &self,
        cds: &CdsContract,
        hazard_curve: &dyn TermStructure,
        context: &ValuationContext,
        clean_price: bool,
    ) -> CdsResult<f64> {
        check_context(cds, context)?;

        debug!(notional = cds.notional(), maturity = cds.maturity(), "Valuing CDS");

        let price = self.price_legs(cds, hazard_curve, context, clean_price);

        debug!(price, clean_price, "CDS valued");
        Ok(price)
    }

    fn price_legs(
        &self,
        cds: &CdsContract,
        hazard_curve: &dyn TermStructure,
        context: &ValuationContext,
        clean_price: bool,
    ) -> f64 {
        let contingent_leg = value_contingent_leg(
            cds,
            &context.contingent_timeline,
            hazard_curve,
            context.settlement_discount_factor,
            self.config.rate_epsilon,
        );
        let fee_leg = value_fee_leg(
            cds,
            &context.payment_timeline,
            &context.accrual_timeline,
            hazard_curve,
            context.stepin_time,
            context.stepin_discount_factor,
            context.settlement_discount_factor,
            self.config.rate_epsilon,
        );

        trace!(contingent_leg, fee_leg, "Leg values");

        let dirty_price = (contingent_leg - fee_leg) * cds.notional();
        if clean_price {
            dirty_price + cds.accrued_interest()
        } else {
            dirty_price
        }
    }

    fn solve_hazard_rate(
        &self,
        cds: &CdsContract,
        flat_spread: f64,
        context: &ValuationContext,
    ) -> CdsResult<f64> {
        check_context(cds, context)?;

        if !flat_spread.is_finite() {
            return Err(CdsError::invalid_input(format!(
                "flat spread must be finite, got {flat_spread}"
            )));
        }
        if cds.maturity() <= PRICING_TIME {
            return Err(CdsError::invalid_input(format!(
                "cannot calibrate to an expired contract (maturity {})",
                cds.maturity()
            )));
        }

        let zero_cds = cds.zero_cds(flat_spread);
        let knots = [cds.maturity()];
        let objective = |rate: f64| {
            let hazard = FlatHazardRate { rate, knots };
            self.price_legs(&zero_cds, &hazard, context, true)
        };

        let solver = SolverConfig::new(self.config.calibration_tolerance, self.config.max_iterations);
        let result = brent(
            objective,
            self.config.hazard_rate_lower,
            self.config.hazard_rate_upper,
            &solver,
        )
        .map_err(|e| {
            warn!(flat_spread, error = %e, "Hazard rate calibration failed");
            CdsError::calibration_failure(e.to_string())
        })?;

        debug!(
            flat_spread,
            hazard_rate = result.root,
            iterations = result.iterations,
            residual = result.residual,
            "Calibrated flat hazard rate"
        );

        Ok(result.root)
    }
}

fn check_context(cds: &CdsContract, context: &ValuationContext) -> CdsResult<()> {
    let coupon_count = cds.coupons().len();
    if context.payment_timeline.len() != coupon_count {
        warn!(
            coupons = coupon_count,
            payments = context.payment_timeline.len(),
            "Rejecting valuation context built for another contract"
        );
        return Err(CdsError::invalid_input(format!(
            "valuation context has {} payments but the contract has {coupon_count} coupons",
            context.payment_timeline.len()
        )));
    }
    if context.stepin_time < PRICING_TIME {
        warn!(
            stepin_time = context.stepin_time,
            "Rejecting valuation with step-in before pricing date"
        );
        return Err(CdsError::invalid_input(
            "cannot value a CDS with step-in date before pricing date",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::CdsCoupon;
    use approx::assert_relative_eq;
    use chrono::{Duration, Utc};

    fn dates(stepin_days: i64) -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>) {
        let pricing = Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap();
        (
            pricing,
            pricing + Duration::days(stepin_days),
            pricing + Duration::days(3),
        )
    }

    fn contract(years: usize, protect_start: bool) -> CdsContract {
        let coupons = (0..years * 4)
            .map(|i| {
                let start = i as f64 * 0.25;
                CdsCoupon::new(start, start + 0.25, start + 0.25, 0.01, 0.25)
            })
            .collect();
        CdsContract::builder()
            .coupons(coupons)
            .maturity(years as f64)
            .notional(1_000_000.0)
            .recovery_rate(0.4)
            .protect_start(protect_start)
            .accrued_year_fraction(1.0 / 360.0)
            .build()
            .unwrap()
    }

    fn curves() -> (IsdaCurve, IsdaCurve) {
        (
            IsdaCurve::flat("USD", 5.0, 0.02).unwrap(),
            IsdaCurve::flat("ACME", 5.0, 0.03).unwrap(),
        )
    }

    #[test]
    fn test_context_offsets() {
        let cds = contract(1, true);
        let (discount, hazard) = curves();
        let (pricing, stepin, settle) = dates(1);

        let context = ValuationContext::new(
            &cds,
            &discount,
            HazardKnots::Curve(&hazard),
            &pricing,
            &stepin,
            &settle,
        );

        assert_eq!(context.stepin_time(), 0.0);
        assert_eq!(context.stepin_discount_factor(), 1.0);
        assert_relative_eq!(
            context.settlement_discount_factor(),
            (-0.02_f64 * 3.0 / 365.0).exp(),
            epsilon = 1e-15
        );
        assert_eq!(context.contingent_timeline().time_points().first().copied(), Some(0.0));
        assert_eq!(context.contingent_timeline().last_time(), Some(1.0));
        assert_eq!(
            context.accrual_timeline().last_time(),
            Some(1.0 + crate::ONE_DAY_ACT_365F)
        );
        assert_eq!(context.payment_timeline().len(), 4);
    }

    #[test]
    fn test_stepin_before_pricing_rejected() {
        // Protect start pulls a same-day step-in before the pricing time
        let cds = contract(1, true);
        let (discount, hazard) = curves();
        let (pricing, stepin, settle) = dates(0);

        let pricer = IsdaApproxPricer::default();
        let result =
            pricer.calculate_upfront_charge(&cds, &discount, &hazard, &pricing, &stepin, &settle, true);
        assert!(matches!(result, Err(CdsError::InvalidInput { .. })));

        let result = pricer.calibrate_hazard_rate(&cds, &discount, 0.01, &pricing, &stepin, &settle);
        assert!(matches!(result, Err(CdsError::InvalidInput { .. })));

        // Without protect start the same dates are valid
        let cds = contract(1, false);
        assert!(pricer
            .calculate_upfront_charge(&cds, &discount, &hazard, &pricing, &stepin, &settle, true)
            .is_ok());
    }

    #[test]
    fn test_context_from_another_contract_rejected() {
        let (discount, hazard) = curves();
        let (pricing, stepin, settle) = dates(1);
        let short = contract(1, true);
        let long = contract(5, true);
        let context = ValuationContext::new(
            &short,
            &discount,
            HazardKnots::Curve(&hazard),
            &pricing,
            &stepin,
            &settle,
        );

        let pricer = IsdaApproxPricer::default();
        let result = pricer.value_cds(&long, &hazard, &context, true);
        assert!(matches!(result, Err(CdsError::InvalidInput { .. })));

        assert!(pricer.value_cds(&short, &hazard, &context, true).is_ok());
    }

    #[test]
    fn test_clean_is_dirty_plus_accrued() {
        let cds = contract(5, true);
        let (discount, hazard) = curves();
        let (pricing, stepin, settle) = dates(1);
        let pricer = IsdaApproxPricer::default();

        let clean = pricer
            .calculate_upfront_charge(&cds, &discount, &hazard, &pricing, &stepin, &settle, true)
            .unwrap();
        let dirty = pricer
            .calculate_upfront_charge(&cds, &discount, &hazard, &pricing, &stepin, &settle, false)
            .unwrap();

        assert_eq!(clean, dirty + cds.accrued_interest());
    }

    #[test]
    fn test_calibration_reprices_zero_cds() {
        let cds = contract(5, true);
        let (discount, _) = curves();
        let (pricing, stepin, settle) = dates(1);
        let pricer = IsdaApproxPricer::default();

        let rate = pricer
            .calibrate_hazard_rate(&cds, &discount, 0.012, &pricing, &stepin, &settle)
            .unwrap();
        // Credit triangle: spread ~ lambda * (1 - R)
        assert_relative_eq!(rate, 0.012 / 0.6, max_relative = 0.05);

        let hazard = IsdaCurve::flat(CALIBRATED_CURVE_NAME, cds.maturity(), rate).unwrap();
        let zero = cds.zero_cds(0.012);
        let price = pricer
            .calculate_upfront_charge(&zero, &discount, &hazard, &pricing, &stepin, &settle, true)
            .unwrap();
        assert!(price.abs() < 1e-9);
    }

    #[test]
    fn test_upfront_from_spread_sign() {
        // Paying 100bp when the market quotes 150bp: protection buyer pays up front
        let cds = contract(5, true);
        let (discount, _) = curves();
        let (pricing, stepin, settle) = dates(1);
        let pricer = IsdaApproxPricer::default();

        let wide = pricer
            .calculate_upfront_charge_from_spread(&cds, &discount, 0.015, &pricing, &stepin, &settle, true)
            .unwrap();
        let tight = pricer
            .calculate_upfront_charge_from_spread(&cds, &discount, 0.005, &pricing, &stepin, &settle, true)
            .unwrap();
        let par = pricer
            .calculate_upfront_charge_from_spread(&cds, &discount, 0.01, &pricing, &stepin, &settle, true)
            .unwrap();

        assert!(wide > 0.0);
        assert!(tight < 0.0);
        assert!(par.abs() < 1e-3);
    }

    #[test]
    fn test_calibration_failure_without_loss() {
        // Full recovery: protection is worthless, no root in the bracket
        let cds = CdsContract::builder()
            .coupons(vec![CdsCoupon::new(0.0, 1.0, 1.0, 0.01, 1.0)])
            .maturity(1.0)
            .recovery_rate(1.0)
            .build()
            .unwrap();
        let (discount, _) = curves();
        let (pricing, stepin, settle) = dates(1);

        let result = IsdaApproxPricer::default()
            .calibrate_hazard_rate(&cds, &discount, 0.01, &pricing, &stepin, &settle);

        assert!(matches!(result, Err(CdsError::CalibrationFailure { .. })));
    }

    #[test]
    fn test_calibration_rejects_expired_contract() {
        let cds = CdsContract::builder()
            .coupons(vec![CdsCoupon::new(-1.0, -0.5, -0.5, 0.01, 0.5)])
            .maturity(-0.5)
            .recovery_rate(0.4)
            .build()
            .unwrap();
        let (discount, _) = curves();
        let (pricing, stepin, settle) = dates(1);

        let result = IsdaApproxPricer::default()
            .calibrate_hazard_rate(&cds, &discount, 0.01, &pricing, &stepin, &settle);

        assert!(matches!(result, Err(CdsError::InvalidInput { .. })));
    }

    #[test]
    fn test_new_validates_config() {
        let bad = IsdaPricerConfig::default().with_hazard_rate_bracket(1.0, 0.0);
        assert!(IsdaApproxPricer::new(bad).is_err());

        let pricer = IsdaApproxPricer::new(IsdaPricerConfig::default().with_max_iterations(50)).unwrap();
        assert_eq!(pricer.config().max_iterations, 50);
    }
}

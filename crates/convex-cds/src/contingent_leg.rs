//! Protection (contingent) leg valuation.

use convex_curves::TermStructure;

use crate::contract::CdsContract;
use crate::timeline::Timeline;
use crate::{PRICING_TIME, SERIES_EXPANSION_LIMIT};

/// Values the contingent leg per unit notional, forward-valued to settlement.
pub fn value_contingent_leg(
    contract: &CdsContract,
    contingent_timeline: &Timeline,
    hazard_curve: &dyn TermStructure,
    settlement_discount_factor: f64,
    rate_epsilon: f64,
) -> f64 {
    let recovery_rate = contract.recovery_rate();
    let value = if contract.pay_on_default() {
        value_pay_on_default(recovery_rate, contingent_timeline, hazard_curve, rate_epsilon)
    } else {
        value_pay_on_maturity(recovery_rate, contingent_timeline, hazard_curve)
    };

    value / settlement_discount_factor
}

/// Loss paid at the time of default.
///
/// Over each sub-interval with flat hazard `lambda` and forward `f`:
/// `loss * lambda / (lambda + f) * (1 - exp(-(lambda + f) dt)) * Q0 * P0`.
/// When `lambda + f` nearly cancels the factor tends to `dt`.
pub fn value_pay_on_default(
    recovery_rate: f64,
    timeline: &Timeline,
    hazard_curve: &dyn TermStructure,
    rate_epsilon: f64,
) -> f64 {
    let times = timeline.time_points();
    let discount_factors = timeline.discount_factors();

    match timeline.last_time() {
        Some(maturity) if maturity >= PRICING_TIME => {}
        _ => return 0.0,
    }

    let loss = 1.0 - recovery_rate;

    let mut survival1 = hazard_curve.value_at(times[0]);
    let mut discount1 = if times[0] > PRICING_TIME {
        discount_factors[0]
    } else {
        1.0
    };
    let mut value = 0.0;

    for i in 1..times.len() {
        let dt = times[i] - times[i - 1];

        let survival0 = survival1;
        let discount0 = discount1;
        survival1 = hazard_curve.value_at(times[i]);
        discount1 = discount_factors[i];

        let lambda = (survival0 / survival1).ln() / dt;
        let fwd_rate = (discount0 / discount1).ln() / dt;
        let lambda_fwd = lambda + fwd_rate;

        value += loss * lambda * exposure(lambda_fwd, dt, rate_epsilon) * survival0 * discount0;
    }

    value
}

/// `integral_0^dt exp(-k u) du`, expanded in `k * dt` when that is small.
fn exposure(k: f64, dt: f64, rate_epsilon: f64) -> f64 {
    let x = k * dt;
    if x.abs() < SERIES_EXPANSION_LIMIT {
        dt * (1.0 - x / 2.0 * (1.0 - x / 3.0 * (1.0 - x / 4.0)))
    } else {
        -(-x).exp_m1() / (k + rate_epsilon)
    }
}

/// Loss paid at maturity: `(Q_first - Q_last) * P_last * loss`.
pub fn value_pay_on_maturity(
    recovery_rate: f64,
    timeline: &Timeline,
    hazard_curve: &dyn TermStructure,
) -> f64 {
    let times = timeline.time_points();
    let (Some(&first), Some(&last)) = (times.first(), times.last()) else {
        return 0.0;
    };
    if last < PRICING_TIME {
        return 0.0;
    }

    let loss = 1.0 - recovery_rate;
    let survival0 = hazard_curve.value_at(first);
    let survival1 = hazard_curve.value_at(last);
    let discount = timeline.discount_factors()[times.len() - 1];

    (survival0 - survival1) * discount * loss
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::CdsCoupon;
    use approx::assert_relative_eq;
    use convex_curves::IsdaCurve;

    const EPS: f64 = 1e-50;

    fn flat(rate: f64) -> IsdaCurve {
        IsdaCurve::flat("FLAT", 1.0, rate).unwrap()
    }

    #[test]
    fn test_pay_on_default_flat_curves() {
        // Constant lambda and r: loss * lambda / (lambda + r) * (1 - exp(-(lambda + r) T))
        let (lambda, r, t) = (0.03, 0.02, 5.0);
        let discount = flat(r);
        let hazard = flat(lambda);
        let timeline = Timeline::from_times(vec![0.0, 1.0, 2.5, 5.0], &discount);

        let value = value_pay_on_default(0.4, &timeline, &hazard, EPS);

        let expected = 0.6 * lambda / (lambda + r) * (1.0 - (-(lambda + r) * t).exp());
        assert_relative_eq!(value, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_pay_on_default_zero_rates() {
        let discount = flat(0.0);
        let hazard = flat(0.0);
        let timeline = Timeline::from_times(vec![0.0, 1.0], &discount);

        let value = value_pay_on_default(0.4, &timeline, &hazard, EPS);

        assert!(value.is_finite());
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_pay_on_default_offsetting_rates() {
        // Negative discount rate equal to -lambda: Q * P stays at one
        let discount = flat(-0.03);
        let hazard = flat(0.03);
        let timeline = Timeline::from_times(vec![0.0, 1.0, 2.5, 5.0], &discount);

        let value = value_pay_on_default(0.4, &timeline, &hazard, EPS);

        assert_relative_eq!(value, 0.6 * 0.03 * 5.0, max_relative = 1e-12);
    }

    #[test]
    fn test_pay_on_default_nearly_offsetting_rates() {
        let timeline_times = vec![0.0, 1.0, 2.5, 5.0];
        for k in [1e-4, -1e-4, 1e-3, 0.01] {
            let discount = flat(k - 0.03);
            let hazard = flat(0.03);
            let timeline = Timeline::from_times(timeline_times.clone(), &discount);

            let value = value_pay_on_default(0.4, &timeline, &hazard, EPS);

            let expected = 0.6 * 0.03 * -(-k * 5.0_f64).exp_m1() / k;
            assert_relative_eq!(value, expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_pay_on_maturity_reduces_to_survival_difference() {
        // Unit discounting, zero recovery
        let discount = flat(0.0);
        let hazard = flat(0.05);
        let timeline = Timeline::from_times(vec![0.1, 0.6, 1.0], &discount);

        let value = value_pay_on_maturity(0.0, &timeline, &hazard);

        let expected = (-0.05_f64 * 0.1).exp() - (-0.05_f64).exp();
        assert_relative_eq!(value, expected, epsilon = 1e-15);
    }

    #[test]
    fn test_expired_timeline_is_worthless() {
        let discount = flat(0.02);
        let hazard = flat(0.05);
        let timeline = Timeline::from_times(vec![-0.5, -0.1], &discount);

        assert_eq!(value_pay_on_default(0.4, &timeline, &hazard, EPS), 0.0);
        assert_eq!(value_pay_on_maturity(0.4, &timeline, &hazard), 0.0);
        assert_eq!(value_pay_on_default(0.4, &Timeline::default(), &hazard, EPS), 0.0);
        assert_eq!(value_pay_on_maturity(0.4, &Timeline::default(), &hazard), 0.0);
    }

    #[test]
    fn test_dispatch_and_settlement() {
        let discount = flat(0.02);
        let hazard = flat(0.05);
        let timeline = Timeline::from_times(vec![0.0, 1.0], &discount);

        let build = |pay_on_default: bool| {
            CdsContract::builder()
                .coupons(vec![CdsCoupon::new(0.0, 1.0, 1.0, 0.01, 1.0)])
                .maturity(1.0)
                .recovery_rate(0.4)
                .pay_on_default(pay_on_default)
                .build()
                .unwrap()
        };

        let at_default = value_contingent_leg(&build(true), &timeline, &hazard, 0.98, EPS);
        let at_maturity = value_contingent_leg(&build(false), &timeline, &hazard, 0.98, EPS);

        assert_relative_eq!(
            at_default,
            value_pay_on_default(0.4, &timeline, &hazard, EPS) / 0.98,
            epsilon = 1e-15
        );
        // Paying later is worth less when rates are positive
        assert!(at_maturity < at_default);
    }
}

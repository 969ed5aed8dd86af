//! Premium (fee) leg valuation.
//!
//! Each coupon is paid if the name survives to the end of its period. With
//! accrual on default, the premium accrued between the period start and a
//! default is also paid; that term is integrated in closed form over the
//! accrual timeline assuming flat forward hazard and discount rates between
//! consecutive points.

use convex_curves::TermStructure;

use crate::contract::CdsContract;
use crate::timeline::{period_end_times, Timeline};
use crate::{HALF_DAY_ACT_365F, PRICING_TIME, SERIES_EXPANSION_LIMIT};

/// Values the fee leg per unit notional, forward-valued to settlement.
///
/// `stepin_time` must not precede the pricing time; the caller checks.
pub fn value_fee_leg(
    contract: &CdsContract,
    payment_timeline: &Timeline,
    accrual_timeline: &Timeline,
    hazard_curve: &dyn TermStructure,
    stepin_time: f64,
    stepin_discount_factor: f64,
    settlement_discount_factor: f64,
    rate_epsilon: f64,
) -> f64 {
    let accrual_times = accrual_timeline.time_points();
    let payment_dfs = payment_timeline.discount_factors();
    let mut end_index = 0;
    let mut result = 0.0;

    for ((coupon, period_end), &discount) in contract
        .coupons()
        .iter()
        .zip(period_end_times(contract))
        .zip(payment_dfs)
    {
        let amount = coupon.amount();
        let survival = hazard_curve.value_at(period_end);
        result += amount * survival * discount;

        if contract.accrual_on_default() && !accrual_times.is_empty() {
            // Single forward pass over the accrual timeline
            let start_index = end_index;
            while end_index + 1 < accrual_times.len() && accrual_times[end_index] < period_end {
                end_index += 1;
            }

            result += accrual_on_default_value(
                amount,
                accrual_timeline,
                hazard_curve,
                start_index,
                end_index,
                stepin_time,
                stepin_discount_factor,
                rate_epsilon,
            );
        }
    }

    result / settlement_discount_factor
}

/// Expected accrued premium paid on default within one accrual period.
///
/// The period spans `timeline[start_index..=end_index]`. Sub-intervals
/// ending on or before step-in are skipped. Within each remaining
/// sub-interval, with `k = lambda + f + rate_epsilon` and times measured
/// from the period start plus half a day:
///
/// ```text
/// lambda * a * Q0 * P0 * [(t0 + 1/k) / k - (t1 + 1/k) / k * Q1/Q0 * P1/P0]
/// ```
///
/// where `a` is the premium accrual rate per year. When `(lambda + f) * dt`
/// is small the bracket is replaced by its Taylor series in that product.
pub fn accrual_on_default_value(
    amount: f64,
    timeline: &Timeline,
    hazard_curve: &dyn TermStructure,
    start_index: usize,
    end_index: usize,
    stepin_time: f64,
    stepin_discount_factor: f64,
    rate_epsilon: f64,
) -> f64 {
    if end_index <= start_index {
        return 0.0;
    }

    let times = timeline.time_points();
    let discount_factors = timeline.discount_factors();

    let start_time = times[start_index];
    let end_time = times[end_index];
    let sub_start_time = stepin_time.max(start_time);
    let accrual_rate = amount / (end_time - start_time);

    let mut t0 = sub_start_time - start_time + HALF_DAY_ACT_365F;
    let mut survival0 = hazard_curve.value_at(sub_start_time);
    let mut discount0 = if start_time < stepin_time || start_time < PRICING_TIME {
        stepin_discount_factor
    } else {
        discount_factors[start_index]
    };

    let mut value = 0.0;

    for i in start_index + 1..=end_index {
        if times[i] <= stepin_time {
            continue;
        }

        let t1 = times[i] - start_time + HALF_DAY_ACT_365F;
        let dt = t1 - t0;

        let survival1 = hazard_curve.value_at(times[i]);
        let discount1 = discount_factors[i];

        let lambda = (survival0 / survival1).ln() / dt;
        let fwd_rate = (discount0 / discount1).ln() / dt;
        let lambda_fwd = lambda + fwd_rate;

        let moment = if (lambda_fwd * dt).abs() < SERIES_EXPANSION_LIMIT {
            accrual_moment_series(t0, dt, lambda_fwd)
        } else {
            let k = lambda_fwd + rate_epsilon;
            (t0 + 1.0 / k) / k - (t1 + 1.0 / k) / k * survival1 / survival0 * discount1 / discount0
        };
        value += lambda * accrual_rate * survival0 * discount0 * moment;

        t0 = t1;
        survival0 = survival1;
        discount0 = discount1;
    }

    value
}

/// `integral_0^dt (t0 + u) exp(-k u) du` to fourth order in `k * dt`.
fn accrual_moment_series(t0: f64, dt: f64, k: f64) -> f64 {
    let mut sum = 0.0;
    // (-k)^n dt^(n+1) / n!
    let mut term = dt;
    for n in 0..4_u8 {
        let n = f64::from(n);
        sum += term * (t0 / (n + 1.0) + dt / (n + 2.0));
        term *= -k * dt / (n + 1.0);
    }
    sum
}

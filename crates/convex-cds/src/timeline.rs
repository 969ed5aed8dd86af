//! Integration timelines.
//!
//! Both legs are integrated piecewise between consecutive points of a
//! timeline, assuming flat forward hazard and discount rates in between.
//! Timelines therefore merge every knot of both curves with the contract's
//! period boundaries.

use convex_curves::TermStructure;

use crate::contract::CdsContract;

/// Where the hazard curve's knots come from when building a timeline.
#[derive(Clone, Copy)]
pub enum HazardKnots<'a> {
    /// Knots of an existing hazard curve.
    Curve(&'a dyn TermStructure),
    /// No hazard curve yet (calibration); the contract maturity stands in.
    MaturityOnly,
}

impl std::fmt::Debug for HazardKnots<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Curve(curve) => write!(f, "Curve({:?})", curve.knot_times()),
            Self::MaturityOnly => write!(f, "MaturityOnly"),
        }
    }
}

/// Ordered time points with their discount factors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    time_points: Vec<f64>,
    discount_factors: Vec<f64>,
}

impl Timeline {
    /// Creates a timeline, reading discount factors off `discount_curve`.
    pub fn from_times(time_points: Vec<f64>, discount_curve: &dyn TermStructure) -> Self {
        let discount_factors = time_points
            .iter()
            .map(|&t| discount_curve.value_at(t))
            .collect();
        Self {
            time_points,
            discount_factors,
        }
    }

    /// The time points.
    pub fn time_points(&self) -> &[f64] {
        &self.time_points
    }

    /// Discount factors, one per time point.
    pub fn discount_factors(&self) -> &[f64] {
        &self.discount_factors
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    /// True if the timeline has no points.
    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    /// Last time point, if any.
    pub fn last_time(&self) -> Option<f64> {
        self.time_points.last().copied()
    }
}

/// Builds the merged timeline over `[lower, end_time]`.
///
/// Candidates are the discount curve knots, the hazard knots, `start_time`
/// and `end_time`. With `include_schedule` the protect-start shifted first
/// accrual start and every period end are added too, and the shifted first
/// accrual start replaces `start_time` as the lower bound.
///
/// Points are deduplicated by exact equality: knots and period boundaries
/// derived from the same date under ACT/365F produce identical doubles.
pub fn build_timeline(
    contract: &CdsContract,
    discount_curve: &dyn TermStructure,
    hazard: HazardKnots<'_>,
    start_time: f64,
    end_time: f64,
    include_schedule: bool,
) -> Timeline {
    let mut points: Vec<f64> = discount_curve.knot_times().to_vec();

    match hazard {
        HazardKnots::Curve(curve) => points.extend_from_slice(curve.knot_times()),
        HazardKnots::MaturityOnly => points.push(contract.maturity()),
    }
    points.push(start_time);
    points.push(end_time);

    let mut lower = start_time;
    if include_schedule {
        let offset = contract.protect_start_offset();
        let coupons = contract.coupons();

        if let Some(first) = coupons.first() {
            lower = first.accrual_start_time - offset;
            points.push(lower);
        }
        points.extend(period_end_times(contract));
    }

    points.retain(|&t| t >= lower && t <= end_time);
    points.sort_by(f64::total_cmp);
    points.dedup();

    Timeline::from_times(points, discount_curve)
}

/// Builds the payment timeline: one point per coupon payment time.
pub fn build_payment_timeline(contract: &CdsContract, discount_curve: &dyn TermStructure) -> Timeline {
    let times = contract.coupons().iter().map(|c| c.payment_time).collect();
    Timeline::from_times(times, discount_curve)
}

/// Period end times as observed by protection: every accrual end except
/// the last is pulled back by the protect-start offset.
pub(crate) fn period_end_times(contract: &CdsContract) -> impl Iterator<Item = f64> + '_ {
    let offset = contract.protect_start_offset();
    let last = contract.coupons().len().saturating_sub(1);
    contract
        .coupons()
        .iter()
        .enumerate()
        .map(move |(i, c)| c.accrual_end_time - if i < last { offset } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::CdsCoupon;
    use crate::ONE_DAY_ACT_365F;
    use approx::assert_relative_eq;
    use convex_curves::IsdaCurve;
    use proptest::prelude::*;

    fn contract(protect_start: bool) -> CdsContract {
        let coupons = (0..4)
            .map(|i| {
                let start = f64::from(i) * 0.25;
                CdsCoupon::new(start, start + 0.25, start + 0.25, 0.01, 0.25)
            })
            .collect();
        CdsContract::builder()
            .coupons(coupons)
            .maturity(1.0)
            .recovery_rate(0.4)
            .protect_start(protect_start)
            .build()
            .unwrap()
    }

    #[test]
    fn test_accrual_timeline_merges_schedule() {
        let cds = contract(false);
        let discount = IsdaCurve::new("USD", vec![0.1, 0.5, 2.0], vec![0.02, 0.02, 0.02]).unwrap();
        let hazard = IsdaCurve::new("ACME", vec![0.3, 1.0], vec![0.01, 0.02]).unwrap();

        let timeline = build_timeline(&cds, &discount, HazardKnots::Curve(&hazard), 0.0, 1.0, true);

        assert_eq!(timeline.time_points(), &[0.0, 0.1, 0.25, 0.3, 0.5, 0.75, 1.0]);
        assert_eq!(timeline.len(), timeline.discount_factors().len());
        assert_relative_eq!(timeline.discount_factors()[1], discount.value_at(0.1));
    }

    #[test]
    fn test_protect_start_offsets() {
        let cds = contract(true);
        let discount = IsdaCurve::flat("USD", 5.0, 0.02).unwrap();
        let end = 1.0 + ONE_DAY_ACT_365F;

        let timeline = build_timeline(&cds, &discount, HazardKnots::MaturityOnly, 0.0, end, true);
        let points = timeline.time_points();

        assert_eq!(points.first().copied(), Some(-ONE_DAY_ACT_365F));
        assert_eq!(points.last().copied(), Some(end));
        assert!(points.contains(&(0.25 - ONE_DAY_ACT_365F)));
        // Final period end is not offset; it is the contract maturity
        assert!(points.contains(&1.0));
    }

    #[test]
    fn test_contingent_timeline_without_schedule() {
        let cds = contract(true);
        let discount = IsdaCurve::new("USD", vec![0.5, 2.0], vec![0.02, 0.03]).unwrap();

        let timeline = build_timeline(&cds, &discount, HazardKnots::MaturityOnly, 0.2, 1.0, false);

        assert_eq!(timeline.time_points(), &[0.2, 0.5, 1.0]);
    }

    #[test]
    fn test_empty_when_start_after_end() {
        let cds = contract(false);
        let discount = IsdaCurve::flat("USD", 5.0, 0.02).unwrap();

        let timeline = build_timeline(&cds, &discount, HazardKnots::MaturityOnly, 0.5, -0.1, false);

        assert!(timeline.is_empty());
        assert_eq!(timeline.last_time(), None);
    }

    #[test]
    fn test_payment_timeline() {
        let cds = contract(true);
        let discount = IsdaCurve::flat("USD", 5.0, 0.02).unwrap();

        let timeline = build_payment_timeline(&cds, &discount);

        assert_eq!(timeline.time_points(), &[0.25, 0.5, 0.75, 1.0]);
        assert_relative_eq!(timeline.discount_factors()[3], (-0.02_f64).exp());
    }

    proptest! {
        #[test]
        fn prop_timeline_sorted_unique_and_bounded(
            knots in proptest::collection::vec(0.01f64..10.0, 1..8),
            start in -0.5f64..2.0,
            len in 0.0f64..8.0,
        ) {
            let mut knots = knots;
            knots.sort_by(f64::total_cmp);
            knots.dedup();
            let rates = vec![0.02; knots.len()];
            let discount = IsdaCurve::new("P", knots, rates).unwrap();
            let cds = contract(true);
            let end = start + len;

            let timeline = build_timeline(&cds, &discount, HazardKnots::MaturityOnly, start, end, false);
            let points = timeline.time_points();

            prop_assert!(points.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(points.first().copied(), Some(start));
            prop_assert_eq!(points.last().copied(), Some(end));
        }

        #[test]
        fn prop_schedule_timeline_starts_at_shifted_accrual_start(
            knots in proptest::collection::vec(0.01f64..10.0, 1..8),
            protect_start in any::<bool>(),
            start in -0.5f64..2.0,
            end in 0.0f64..8.0,
        ) {
            let mut knots = knots;
            knots.sort_by(f64::total_cmp);
            knots.dedup();
            let rates = vec![0.02; knots.len()];
            let discount = IsdaCurve::new("P", knots, rates).unwrap();
            let cds = contract(protect_start);
            let offset = if protect_start { ONE_DAY_ACT_365F } else { 0.0 };

            let timeline = build_timeline(&cds, &discount, HazardKnots::MaturityOnly, start, end, true);
            let points = timeline.time_points();

            prop_assert!(points.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(points.first().copied(), Some(-offset));
            prop_assert_eq!(points.last().copied(), Some(end));
            for period_end in period_end_times(&cds).filter(|&t| t <= end) {
                prop_assert!(points.contains(&period_end));
            }
        }
    }
}

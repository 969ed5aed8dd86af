//! ISDA-style zero-rate curve.
//!
//! The ISDA CDS standard model stores both discount and credit curves as
//! continuously compounded zero rates at knot times, with flat forward
//! interpolation between knots. A curve value is `exp(-r(t) * t)`: a
//! discount factor for an interest-rate curve, a survival probability for a
//! hazard curve (where `r` is then the average hazard rate to `t`).

use convex_math::interpolation::{FlatForward, Interpolator};

use crate::error::{CurveError, CurveResult};
use crate::term_structure::TermStructure;

/// A zero-rate curve with flat forward interpolation.
///
/// Before the first knot the zero rate is held flat; beyond the last knot
/// the final forward rate is extended. A single knot gives a flat curve,
/// which is how calibrated hazard curves are represented.
///
/// # Example
///
/// ```rust
/// use convex_curves::{IsdaCurve, TermStructure};
///
/// let hazard = IsdaCurve::flat("ACME", 5.0, 0.02).unwrap();
///
/// // Survival to 2.5Y under a flat 2% hazard rate
/// let q = hazard.value_at(2.5);
/// assert!((q - (-0.05_f64).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct IsdaCurve {
    name: String,
    interpolator: FlatForward,
}

impl IsdaCurve {
    /// Creates a curve from knot times (years, ACT/365F) and zero rates.
    ///
    /// # Errors
    ///
    /// Returns an error if no knots are given, the lengths differ, a value
    /// is not finite, or the times are not strictly increasing and positive.
    pub fn new(name: impl Into<String>, times: Vec<f64>, rates: Vec<f64>) -> CurveResult<Self> {
        if times.is_empty() {
            return Err(CurveError::insufficient_points(1, 0));
        }
        if times.len() != rates.len() {
            return Err(CurveError::invalid_value(format!(
                "{} knot times but {} rates",
                times.len(),
                rates.len()
            )));
        }
        if let Some((i, w)) = times.windows(2).enumerate().find(|(_, w)| w[1] <= w[0]) {
            return Err(CurveError::non_monotonic_tenors(i + 1, w[0], w[1]));
        }

        let interpolator = FlatForward::new(times, rates)?.with_extrapolation();

        Ok(Self {
            name: name.into(),
            interpolator,
        })
    }

    /// Creates a flat curve with a single knot.
    pub fn flat(name: impl Into<String>, time: f64, rate: f64) -> CurveResult<Self> {
        Self::new(name, vec![time], vec![rate])
    }

    /// Returns the curve name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the zero rates at the knots.
    pub fn rates(&self) -> &[f64] {
        self.interpolator.zero_rates()
    }

    /// Returns the continuously compounded zero rate at time t.
    pub fn zero_rate(&self, t: f64) -> f64 {
        // Extrapolation is enabled, so every finite t is in range
        self.interpolator
            .interpolate(t)
            .unwrap_or(self.interpolator.zero_rates()[0])
    }
}

impl TermStructure for IsdaCurve {
    fn value_at(&self, t: f64) -> f64 {
        (-self.zero_rate(t) * t).exp()
    }

    fn knot_times(&self) -> &[f64] {
        self.interpolator.tenors()
    }
}

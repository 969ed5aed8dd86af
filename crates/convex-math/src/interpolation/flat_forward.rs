//! Flat forward interpolation.
//!
//! Flat forward interpolation assumes constant forward rates between pillar
//! points, which is equivalent to interpolating `r(t) * t` linearly in `t`.
//!
//! # Mathematical Background
//!
//! Given zero rates r_i at pillar points t_i, the forward rate f_i between
//! t_i and t_{i+1} is:
//!
//! ```text
//! f_i = (r_{i+1} * t_{i+1} - r_i * t_i) / (t_{i+1} - t_i)
//! ```
//!
//! For t between t_i and t_{i+1}, the interpolated zero rate is:
//!
//! ```text
//! r(t) = (r_i * t_i + f_i * (t - t_i)) / t
//! ```
//!
//! When extrapolation is enabled, the zero rate is held flat before the
//! first pillar and the last forward rate is extended beyond the final
//! pillar. This matches the ISDA CDS standard model's curve conventions.

use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// Flat forward interpolation for zero rate curves.
///
/// A single pillar is accepted and describes a flat curve.
///
/// # Example
///
/// ```rust
/// use convex_math::interpolation::{FlatForward, Interpolator};
///
/// let tenors = vec![1.0, 2.0, 5.0, 10.0];
/// let zero_rates = vec![0.02, 0.025, 0.03, 0.035];
///
/// let interp = FlatForward::new(tenors, zero_rates).unwrap();
///
/// // Forward rate is flat between 2Y and 5Y
/// let rate_3y = interp.interpolate(3.0).unwrap();
/// assert!(rate_3y > 0.025 && rate_3y < 0.03);
/// ```
#[derive(Debug, Clone)]
pub struct FlatForward {
    tenors: Vec<f64>,
    zero_rates: Vec<f64>,
    /// Forward rate on `[t_i, t_{i+1})`; the last entry applies beyond the final pillar.
    forward_rates: Vec<f64>,
    allow_extrapolation: bool,
}

impl FlatForward {
    /// Creates a new flat forward interpolator from zero rates.
    ///
    /// # Arguments
    ///
    /// * `tenors` - Time points in years (must be strictly increasing, > 0)
    /// * `zero_rates` - Zero rates at each tenor (as decimals, e.g., 0.05 for 5%)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No points are provided
    /// - Tenors and zero_rates have different lengths
    /// - Tenors are not strictly increasing
    /// - Any tenor or rate is not finite, or a tenor is <= 0
    pub fn new(tenors: Vec<f64>, zero_rates: Vec<f64>) -> MathResult<Self> {
        if tenors.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }
        if tenors.len() != zero_rates.len() {
            return Err(MathError::invalid_input(format!(
                "tenors and zero_rates must have same length: {} vs {}",
                tenors.len(),
                zero_rates.len()
            )));
        }
        if tenors.iter().chain(zero_rates.iter()).any(|x| !x.is_finite()) {
            return Err(MathError::invalid_input(
                "tenors and zero rates must be finite",
            ));
        }
        if tenors[0] <= 0.0 {
            return Err(MathError::invalid_input(
                "First tenor must be positive for flat forward interpolation",
            ));
        }
        if tenors.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "Tenors must be strictly increasing",
            ));
        }

        let forward_rates = Self::compute_forward_rates(&tenors, &zero_rates);

        Ok(Self {
            tenors,
            zero_rates,
            forward_rates,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    ///
    /// When extrapolating:
    /// - Below first tenor: first zero rate is held flat
    /// - Above last tenor: last forward rate is extended
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    fn compute_forward_rates(tenors: &[f64], zero_rates: &[f64]) -> Vec<f64> {
        let mut forwards: Vec<f64> = tenors
            .windows(2)
            .zip(zero_rates.windows(2))
            .map(|(t, r)| (r[1] * t[1] - r[0] * t[0]) / (t[1] - t[0]))
            .collect();

        let tail = forwards.last().copied().unwrap_or(zero_rates[0]);
        forwards.push(tail);
        forwards
    }

    /// Returns i such that tenors[i] <= t < tenors[i+1], clamped to the last pillar.
    fn find_segment(&self, t: f64) -> usize {
        self.tenors.partition_point(|&x| x <= t).saturating_sub(1)
    }

    fn last_tenor(&self) -> f64 {
        self.tenors[self.tenors.len() - 1]
    }

    fn check_range(&self, t: f64) -> MathResult<()> {
        if !self.allow_extrapolation && !self.in_range(t) {
            return Err(MathError::ExtrapolationNotAllowed {
                x: t,
                min: self.tenors[0],
                max: self.last_tenor(),
            });
        }
        Ok(())
    }

    /// Returns the tenors.
    pub fn tenors(&self) -> &[f64] {
        &self.tenors
    }

    /// Returns the zero rates.
    pub fn zero_rates(&self) -> &[f64] {
        &self.zero_rates
    }
}

impl Interpolator for FlatForward {
    fn interpolate(&self, t: f64) -> MathResult<f64> {
        self.check_range(t)?;

        if t <= self.tenors[0] {
            return Ok(self.zero_rates[0]);
        }

        // Beyond the last pillar this extends the final forward rate
        let i = self.find_segment(t);
        let t_i = self.tenors[i];
        let r_i = self.zero_rates[i];
        let f_i = self.forward_rates[i];

        Ok((r_i * t_i + f_i * (t - t_i)) / t)
    }

    fn derivative(&self, t: f64) -> MathResult<f64> {
        self.check_range(t)?;

        if t <= self.tenors[0] {
            return Ok(0.0);
        }

        let i = self.find_segment(t);
        let t_i = self.tenors[i];
        let r_i = self.zero_rates[i];
        let f_i = self.forward_rates[i];

        // r(t) = (r_i - f_i) * t_i / t + f_i
        Ok((f_i - r_i) * t_i / (t * t))
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.tenors[0]
    }

    fn max_x(&self) -> f64 {
        self.last_tenor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_forward_through_pillars() {
        let tenors = vec![1.0, 2.0, 5.0, 10.0];
        let zero_rates = vec![0.02, 0.025, 0.03, 0.035];

        let interp = FlatForward::new(tenors.clone(), zero_rates.clone()).unwrap();

        for (t, r) in tenors.iter().zip(zero_rates.iter()) {
            assert_relative_eq!(interp.interpolate(*t).unwrap(), *r, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_flat_forward_rates() {
        let tenors = vec![1.0, 2.0, 3.0];
        let zero_rates = vec![0.02, 0.03, 0.04];

        let interp = FlatForward::new(tenors, zero_rates).unwrap();
        let rt = |t: f64| interp.interpolate(t).unwrap() * t;

        // f = (0.03 * 2 - 0.02 * 1) / (2 - 1) = 0.04
        assert_relative_eq!(rt(1.5) - rt(1.25), 0.04 * 0.25, epsilon = 1e-12);

        // f = (0.04 * 3 - 0.03 * 2) / (3 - 2) = 0.06
        assert_relative_eq!(rt(2.5) - rt(2.25), 0.06 * 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_rt_is_linear_between_pillars() {
        let interp = FlatForward::new(vec![1.0, 3.0], vec![0.02, 0.04]).unwrap();

        // r(t) * t at the midpoint is the average of the pillar values
        let rt = interp.interpolate(2.0).unwrap() * 2.0;
        assert_relative_eq!(rt, 0.5 * (0.02 + 0.12), epsilon = 1e-14);
    }

    #[test]
    fn test_single_pillar_is_flat() {
        let interp = FlatForward::new(vec![5.0], vec![0.03])
            .unwrap()
            .with_extrapolation();

        for t in [0.0, 0.25, 5.0, 12.0] {
            assert_relative_eq!(interp.interpolate(t).unwrap(), 0.03, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_extrapolation() {
        let interp = FlatForward::new(vec![1.0, 2.0], vec![0.02, 0.03])
            .unwrap()
            .with_extrapolation();

        // Flat zero rate on the short end
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 0.02, epsilon = 1e-15);
        assert_relative_eq!(interp.interpolate(-0.01).unwrap(), 0.02, epsilon = 1e-15);

        // Flat forward beyond the last pillar: r(4) = (0.06 + 0.04 * 2) / 4
        assert_relative_eq!(interp.interpolate(4.0).unwrap(), 0.035, epsilon = 1e-14);
    }

    #[test]
    fn test_no_extrapolation_by_default() {
        let interp = FlatForward::new(vec![1.0, 2.0], vec![0.02, 0.03]).unwrap();

        assert!(!interp.allows_extrapolation());
        assert!(interp.interpolate(0.5).is_err());
        assert!(interp.interpolate(2.5).is_err());
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let interp = FlatForward::new(vec![0.5, 1.0, 2.0, 5.0], vec![0.02, 0.025, 0.03, 0.04])
            .unwrap();

        let t = 1.5;
        let h = 1e-6;
        let numerical =
            (interp.interpolate(t + h).unwrap() - interp.interpolate(t - h).unwrap()) / (2.0 * h);

        assert_relative_eq!(interp.derivative(t).unwrap(), numerical, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(FlatForward::new(vec![], vec![]).is_err());
        assert!(FlatForward::new(vec![1.0, 2.0], vec![0.02]).is_err());
        assert!(FlatForward::new(vec![0.0, 1.0], vec![0.02, 0.03]).is_err());
        assert!(FlatForward::new(vec![2.0, 1.0], vec![0.02, 0.03]).is_err());
        assert!(FlatForward::new(vec![1.0, 1.0], vec![0.02, 0.03]).is_err());
        assert!(FlatForward::new(vec![1.0], vec![f64::NAN]).is_err());
    }
}

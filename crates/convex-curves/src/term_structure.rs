//! Core term structure trait.
//!
//! The `TermStructure` trait is the only view of a curve the CDS pricer
//! needs. A discount curve returns discount factors and a hazard curve
//! returns survival probabilities; the pricer never inspects how either is
//! stored or interpolated.
//!
//! # Thread Safety
//!
//! All term structures are required to be `Send + Sync`, so one set of
//! market curves can be shared across parallel valuations without locking.

use std::sync::Arc;

/// Core abstraction for any term structure.
///
/// A term structure maps time (in years from the pricing date, ACT/365F)
/// to a value: a discount factor P(t) or a survival probability Q(t).
///
/// # Example
///
/// ```rust
/// use convex_curves::{IsdaCurve, TermStructure};
///
/// fn annuity(curve: &dyn TermStructure, times: &[f64]) -> f64 {
///     times.iter().map(|&t| 0.25 * curve.value_at(t)).sum()
/// }
///
/// let curve = IsdaCurve::flat("USD", 1.0, 0.0).unwrap();
/// assert!((annuity(&curve, &[0.25, 0.5, 0.75, 1.0]) - 1.0).abs() < 1e-15);
/// ```
pub trait TermStructure: Send + Sync {
    /// Returns the curve value at time t (years from the pricing date).
    ///
    /// Curves must accept any finite t, including small negative times
    /// produced by protect-start offsets, and extrapolate.
    fn value_at(&self, t: f64) -> f64;

    /// Returns the curve's knot times, ascending and unique.
    fn knot_times(&self) -> &[f64];
}

impl<T: TermStructure + ?Sized> TermStructure for &T {
    fn value_at(&self, t: f64) -> f64 {
        (**self).value_at(t)
    }

    fn knot_times(&self) -> &[f64] {
        (**self).knot_times()
    }
}

/// Blanket implementation allowing `Arc<T>` to be used as a `TermStructure`.
impl<T: TermStructure + ?Sized> TermStructure for Arc<T> {
    fn value_at(&self, t: f64) -> f64 {
        (**self).value_at(t)
    }

    fn knot_times(&self) -> &[f64] {
        (**self).knot_times()
    }
}

/// Blanket implementation allowing `Box<T>` to be used as a `TermStructure`.
impl<T: TermStructure + ?Sized> TermStructure for Box<T> {
    fn value_at(&self, t: f64) -> f64 {
        (**self).value_at(t)
    }

    fn knot_times(&self) -> &[f64] {
        (**self).knot_times()
    }
}

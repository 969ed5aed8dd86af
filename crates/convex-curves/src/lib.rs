//! # Convex Curves
//!
//! Term structures consumed by the Convex CDS pricer.
//!
//! This crate provides:
//!
//! - **Curve Trait**: [`TermStructure`], the minimal contract a pricer needs
//!   from a curve: a value at a time and the curve's knot times
//! - **ISDA Curves**: [`IsdaCurve`], a continuously compounded zero-rate
//!   curve with flat forward interpolation. The same type serves as a
//!   discount curve (values are discount factors) and as a hazard curve
//!   (values are survival probabilities)
//!
//! ## Quick Start
//!
//! ```rust
//! use convex_curves::prelude::*;
//!
//! let discount = IsdaCurve::new("USD", vec![1.0, 5.0], vec![0.02, 0.025]).unwrap();
//! let survival = IsdaCurve::flat("ACME", 5.0, 0.03).unwrap();
//!
//! assert!((discount.value_at(1.0) - (-0.02_f64).exp()).abs() < 1e-15);
//! assert!((survival.value_at(2.0) - (-0.06_f64).exp()).abs() < 1e-15);
//! assert_eq!(survival.knot_times(), &[5.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod curves;
pub mod error;
pub mod term_structure;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curves::IsdaCurve;
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::term_structure::TermStructure;
}

pub use curves::IsdaCurve;
pub use error::{CurveError, CurveResult};
pub use term_structure::TermStructure;

//! # Convex Math
//!
//! Numerical building blocks for the Convex CDS pricing library.
//!
//! This crate provides:
//!
//! - **Solvers**: Brent's bracketed root finder, used to calibrate flat
//!   hazard rates to quoted spreads
//! - **Interpolation**: Flat forward interpolation of zero rates, the
//!   scheme ISDA curves use between knots
//!
//! ## Design Philosophy
//!
//! - **Tight tolerances**: the solver terminates on a bracket width scaled
//!   by machine epsilon, so tolerances down to `1e-17` are meaningful
//! - **Numerical Stability**: Careful handling of edge cases
//! - **f64 throughout**: credit pricing works in continuous-time doubles

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{FlatForward, Interpolator};
    pub use crate::solvers::{brent, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};

//! Root-finding algorithms.
//!
//! Calibration in this library only ever needs a bracketed, derivative-free
//! solver, so the module exposes [`brent`] together with its configuration
//! and result types.
//!
//! # Example: implied flat rate
//!
//! ```rust
//! use convex_math::solvers::{brent, SolverConfig};
//!
//! // Rate r such that exp(-5r) = 0.9
//! let f = |r: f64| (-5.0 * r).exp() - 0.9;
//!
//! let result = brent(f, 0.0, 1.0, &SolverConfig::default()).unwrap();
//! assert!((result.root - 0.9_f64.ln() / -5.0).abs() < 1e-12);
//! ```

mod brent;

pub use brent::brent;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Tolerance on the root (bracket width).
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default()
            .with_tolerance(1e-17)
            .with_max_iterations(50);

        assert_eq!(config.tolerance, 1e-17);
        assert_eq!(config.max_iterations, 50);

        let config = SolverConfig::new(1e-8, 20);
        assert_eq!(config.max_iterations, 20);
    }

    #[test]
    fn test_survival_implied_hazard_rate() {
        // Hazard rate reproducing a 3-year survival probability of 0.85
        let target = 0.85_f64;
        let f = |h: f64| (-3.0 * h).exp() - target;

        let result = brent(f, 0.0, 100.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, -target.ln() / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_credit_triangle_like_calculation() {
        // Find h with h * (1 - R) = spread on a simple annuity-weighted leg pair
        let recovery = 0.4;
        let spread = 0.0120;
        let maturity = 5.0;

        let annuity = |h: f64| (1.0 - (-h * maturity).exp()) / h.max(1e-12);
        let f = |h: f64| (1.0 - recovery) * h * annuity(h) - spread * annuity(h);

        let result = brent(f, 1e-6, 10.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, spread / (1.0 - recovery), epsilon = 1e-9);
    }
}

//! Pricer configuration.
//!
//! The numerical constants of the ISDA approximation are exposed here so they
//! can be tuned per deployment. Defaults reproduce the standard model.

use serde::{Deserialize, Serialize};

use crate::error::{CdsError, CdsResult};

/// Tuning parameters for [`IsdaApproxPricer`](crate::IsdaApproxPricer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsdaPricerConfig {
    /// Added to `lambda + f` in the closed-form integrals.
    #[serde(default = "default_rate_epsilon")]
    pub rate_epsilon: f64,

    /// Lower end of the hazard rate calibration bracket.
    #[serde(default = "default_hazard_rate_lower")]
    pub hazard_rate_lower: f64,

    /// Upper end of the hazard rate calibration bracket.
    #[serde(default = "default_hazard_rate_upper")]
    pub hazard_rate_upper: f64,

    /// Root finder tolerance for hazard rate calibration.
    #[serde(default = "default_calibration_tolerance")]
    pub calibration_tolerance: f64,

    /// Root finder iteration limit.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_rate_epsilon() -> f64 {
    1.0e-50
}

fn default_hazard_rate_lower() -> f64 {
    0.0
}

fn default_hazard_rate_upper() -> f64 {
    100.0
}

fn default_calibration_tolerance() -> f64 {
    1.0e-17
}

fn default_max_iterations() -> u32 {
    100
}

impl Default for IsdaPricerConfig {
    fn default() -> Self {
        Self {
            rate_epsilon: default_rate_epsilon(),
            hazard_rate_lower: default_hazard_rate_lower(),
            hazard_rate_upper: default_hazard_rate_upper(),
            calibration_tolerance: default_calibration_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl IsdaPricerConfig {
    /// Parses a configuration from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> CdsResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CdsError::invalid_input(format!("invalid pricer config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the rate epsilon.
    #[must_use]
    pub fn with_rate_epsilon(mut self, rate_epsilon: f64) -> Self {
        self.rate_epsilon = rate_epsilon;
        self
    }

    /// Sets the calibration bracket.
    #[must_use]
    pub fn with_hazard_rate_bracket(mut self, lower: f64, upper: f64) -> Self {
        self.hazard_rate_lower = lower;
        self.hazard_rate_upper = upper;
        self
    }

    /// Sets the calibration tolerance.
    #[must_use]
    pub fn with_calibration_tolerance(mut self, tolerance: f64) -> Self {
        self.calibration_tolerance = tolerance;
        self
    }

    /// Sets the root finder iteration limit.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Checks that the parameters describe a usable solver setup.
    pub fn validate(&self) -> CdsResult<()> {
        if !self.rate_epsilon.is_finite() || self.rate_epsilon < 0.0 {
            return Err(CdsError::invalid_input(format!(
                "rate_epsilon must be finite and non-negative, got {}",
                self.rate_epsilon
            )));
        }
        if !(self.hazard_rate_lower.is_finite() && self.hazard_rate_upper.is_finite())
            || self.hazard_rate_lower >= self.hazard_rate_upper
        {
            return Err(CdsError::invalid_input(format!(
                "hazard rate bracket [{}, {}] is not increasing",
                self.hazard_rate_lower, self.hazard_rate_upper
            )));
        }
        if self.calibration_tolerance.is_nan() || self.calibration_tolerance < 0.0 {
            return Err(CdsError::invalid_input(format!(
                "calibration_tolerance must be non-negative, got {}",
                self.calibration_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(CdsError::invalid_input("max_iterations must be positive"));
        }
        Ok(())
    }
}

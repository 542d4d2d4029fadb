//! Exponential Greenwood confidence bands via `statrs`.
//!
//! Variance: Greenwood's sum `Σ d / (n (n - d))`.
//! Transform: log(-log S), which keeps the interval inside [0, 1].

use statrs::distribution::{ContinuousCDF, Normal};

use super::curve::ConfidenceBand;
use crate::error::SurvivalError;

/// Two-sided standard normal quantile for a confidence level.
pub fn z_score(level: f64) -> Result<f64, SurvivalError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(SurvivalError::InvalidConfidenceLevel(level));
    }
    let normal =
        Normal::new(0.0, 1.0).map_err(|_| SurvivalError::InvalidConfidenceLevel(level))?;
    let alpha = 1.0 - level;
    Ok(normal.inverse_cdf(1.0 - alpha / 2.0))
}

/// Running Greenwood variance term, fed one step at a time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Greenwood {
    z: f64,
    sum: f64,
}

impl Greenwood {
    pub(crate) fn new(z: f64) -> Self {
        Self { z, sum: 0.0 }
    }

    /// Add the step with `events` out of `at_risk` and return the band for
    /// the resulting survival value.
    pub(crate) fn step(&mut self, events: usize, at_risk: usize, survival: f64) -> ConfidenceBand {
        if events > 0 && at_risk > events {
            let n = at_risk as f64;
            let d = events as f64;
            self.sum += d / (n * (n - d));
        }
        self.band(survival)
    }

    pub(crate) fn band(&self, survival: f64) -> ConfidenceBand {
        if survival >= 1.0 || self.sum == 0.0 {
            return ConfidenceBand {
                lower: survival,
                upper: survival,
            };
        }
        if survival <= 0.0 {
            return ConfidenceBand {
                lower: 0.0,
                upper: 0.0,
            };
        }

        let log_s = survival.ln();
        let theta = (-log_s).ln();
        let se = (self.sum / (log_s * log_s)).sqrt();

        let lower = (-(theta + self.z * se).exp()).exp();
        let upper = (-(theta - self.z * se).exp()).exp();
        ConfidenceBand {
            lower: lower.clamp(0.0, 1.0),
            upper: upper.clamp(0.0, 1.0),
        }
    }
}

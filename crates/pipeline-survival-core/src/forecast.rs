//! Monte Carlo revenue forecasting.
//!
//! Each simulated future draws `deals_to_close` values with replacement from
//! the historical deal values and sums them. The spread of those sums shows
//! how much next period's revenue depends on landing one of the rare big deals.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StatsError;
use crate::stats::check_values;

/// Configuration for Monte Carlo simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Deals expected to close in the period
    pub deals_to_close: usize,

    /// Number of simulated futures
    pub futures: usize,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            deals_to_close: 10,
            futures: 100_000,
            seed: None,
        }
    }
}

/// Distribution of simulated period revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueForecast {
    pub deals_to_close: usize,
    pub futures: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Monte Carlo simulator for period revenue.
pub struct RevenueSimulator {
    config: ForecastConfig,
}

impl Default for RevenueSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RevenueSimulator {
    /// Create a new simulator with default config.
    pub fn new() -> Self {
        Self {
            config: ForecastConfig::default(),
        }
    }

    /// Create a simulator with custom config.
    pub fn with_config(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Simulated revenue for every future, in simulation order.
    pub fn simulate_samples(&self, history: &[f64]) -> Result<Vec<f64>, StatsError> {
        check_values(history)?;
        if self.config.deals_to_close == 0 {
            return Err(StatsError::parameter("deals_to_close", "must be at least 1"));
        }
        if self.config.futures == 0 {
            return Err(StatsError::parameter("futures", "must be at least 1"));
        }

        let mut rng = match self.config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };

        let samples: Vec<f64> = (0..self.config.futures)
            .map(|_| {
                (0..self.config.deals_to_close)
                    .map(|_| history[rng.gen_range(0..history.len())])
                    .sum::<f64>()
            })
            .collect();
        Ok(samples)
    }

    /// Run the simulation and summarize it.
    pub fn simulate(&self, history: &[f64]) -> Result<RevenueForecast, StatsError> {
        let mut samples = self.simulate_samples(history)?;
        samples.sort_by(f64::total_cmp);

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        let forecast = RevenueForecast {
            deals_to_close: self.config.deals_to_close,
            futures: self.config.futures,
            mean,
            median: percentile(&samples, 0.5),
            std_dev: variance.sqrt(),
            min: samples[0],
            max: samples[samples.len() - 1],
            p5: percentile(&samples, 0.05),
            p25: percentile(&samples, 0.25),
            p75: percentile(&samples, 0.75),
            p95: percentile(&samples, 0.95),
        };
        debug!(
            futures = forecast.futures,
            deals = forecast.deals_to_close,
            mean = forecast.mean,
            median = forecast.median,
            "simulated revenue"
        );
        Ok(forecast)
    }
}

/// Linear-interpolated percentile of an ascending, non-empty slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Render a forecast as a short report.
pub fn render_forecast(label: &str, forecast: &RevenueForecast) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\nRevenue Forecast: {label} ({} deals, {} futures)\n",
        forecast.deals_to_close, forecast.futures
    ));
    output.push_str(&"=".repeat(50));
    output.push('\n');
    for (name, value) in [
        ("Mean", forecast.mean),
        ("Median", forecast.median),
        ("Std dev", forecast.std_dev),
        ("5th pct", forecast.p5),
        ("25th pct", forecast.p25),
        ("75th pct", forecast.p75),
        ("95th pct", forecast.p95),
    ] {
        output.push_str(&format!("{:<16} {:>12.1}\n", name, value));
    }
    output
}

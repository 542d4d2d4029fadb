//! Deal value distribution statistics.
//!
//! A handful of very large deals can pull the mean far away from what a
//! typical customer pays. The summary reports both so the gap is visible.

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Descriptive statistics for a set of deal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealValueSummary {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// `mean / median`; far from 1.0 means a skewed book
    pub mean_to_median: Option<f64>,
}

impl DealValueSummary {
    /// Summarize `values`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Empty`] when `values` is empty and
    /// [`StatsError::InvalidParameter`] on non-finite values.
    pub fn from_values(values: &[f64]) -> Result<Self, StatsError> {
        check_values(values)?;

        let count = values.len();
        let n = count as f64;
        let total: f64 = values.iter().sum();
        let mean = total / n;
        let median = median(values);
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            count,
            total,
            mean,
            median,
            std_dev: variance.sqrt(),
            min,
            max,
            mean_to_median: if median != 0.0 { Some(mean / median) } else { None },
        })
    }

    /// Whether mean and median differ by more than `tolerance` (relative).
    pub fn is_skewed(&self, tolerance: f64) -> bool {
        self.mean_to_median
            .map(|ratio| (ratio - 1.0).abs() > tolerance)
            .unwrap_or(false)
    }
}

/// One equal-width histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over `[min, max]`; the last bin is closed.
///
/// When every value is identical the range is widened to `value ± 0.5`.
pub fn histogram(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>, StatsError> {
    check_values(values)?;
    if bins == 0 {
        return Err(StatsError::parameter("bins", "must be at least 1"));
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    if !width.is_finite() || width <= 0.0 {
        return Err(StatsError::parameter(
            "values",
            format!("range [{lo}, {hi}] is too wide to bin"),
        ));
    }

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    Ok(out)
}

/// Parse a comma-separated list like `60,40,55,45,50`.
pub fn parse_value_list(input: &str) -> Result<Vec<f64>, StatsError> {
    let values = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| StatsError::parameter("values", format!("'{s}' is not a number")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err(StatsError::Empty);
    }
    Ok(values)
}

/// Render a summary as a short report.
pub fn render_summary(label: &str, summary: &DealValueSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("\nDeal Values: {label}\n"));
    output.push_str(&"=".repeat(50));
    output.push('\n');
    output.push_str(&format!("{:<16} {:>12}\n", "Deals", summary.count));
    output.push_str(&format!("{:<16} {:>12.1}\n", "Total", summary.total));
    output.push_str(&format!("{:<16} {:>12.1}\n", "Mean (ACV)", summary.mean));
    output.push_str(&format!("{:<16} {:>12.1}\n", "Median", summary.median));
    output.push_str(&format!("{:<16} {:>12.1}\n", "Std dev", summary.std_dev));
    output.push_str(&format!("{:<16} {:>12.1}\n", "Min", summary.min));
    output.push_str(&format!("{:<16} {:>12.1}\n", "Max", summary.max));
    if let Some(ratio) = summary.mean_to_median {
        output.push_str(&format!("{:<16} {:>12.2}\n", "Mean / median", ratio));
    }
    if summary.is_skewed(0.2) {
        output.push_str("\nMean and median differ by more than 20%: a few large deals dominate.\n");
    }
    output
}

pub(crate) fn check_values(values: &[f64]) -> Result<(), StatsError> {
    if values.is_empty() {
        return Err(StatsError::Empty);
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(StatsError::parameter("values", format!("{bad} is not finite")));
    }
    Ok(())
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

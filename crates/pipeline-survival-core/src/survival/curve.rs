//! Survival curve output type.
//!
//! A [`SurvivalCurve`] is a right-continuous step function: the value at a
//! point's `time` already includes the drop caused by events at that time.
//! The first point is always the origin `(0, 1.0)`.

use serde::{Deserialize, Serialize};

/// Pointwise confidence interval on the survival probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub lower: f64,
    pub upper: f64,
}

/// One step of the curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalPoint {
    /// Duration at which this step starts
    pub time: f64,
    /// Probability of still being open after `time`
    pub survival: f64,
    /// Records with duration >= `time`
    pub at_risk: usize,
    /// Terminal outcomes observed exactly at `time`
    pub events: usize,
    /// Records censored exactly at `time`
    pub censored: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceBand>,
}

impl SurvivalPoint {
    pub(crate) fn origin(at_risk: usize) -> Self {
        Self {
            time: 0.0,
            survival: 1.0,
            at_risk,
            events: 0,
            censored: 0,
            confidence: None,
        }
    }

    /// Probability the deal has resolved by `time`.
    pub fn win_probability(&self) -> f64 {
        1.0 - self.survival
    }
}

/// Empirical survival function fitted from pipeline records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalCurve {
    points: Vec<SurvivalPoint>,
    record_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence_level: Option<f64>,
}

impl SurvivalCurve {
    pub(crate) fn new(
        points: Vec<SurvivalPoint>,
        record_count: usize,
        confidence_level: Option<f64>,
    ) -> Self {
        Self {
            points,
            record_count,
            confidence_level,
        }
    }

    pub fn points(&self) -> &[SurvivalPoint] {
        &self.points
    }

    /// Number of records the curve was fitted from.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Total number of observed events.
    pub fn event_count(&self) -> usize {
        self.points.iter().map(|p| p.events).sum()
    }

    /// Confidence level used for the bands, if any were computed.
    pub fn confidence_level(&self) -> Option<f64> {
        self.confidence_level
    }

    /// Largest observed duration.
    pub fn last_time(&self) -> f64 {
        self.points.last().map(|p| p.time).unwrap_or(0.0)
    }

    /// Survival probability at `time` (step lookup, right-continuous).
    pub fn survival_at(&self, time: f64) -> f64 {
        self.point_at(time).map(|p| p.survival).unwrap_or(1.0)
    }

    /// Probability of having closed by `time`.
    pub fn win_probability_at(&self, time: f64) -> f64 {
        1.0 - self.survival_at(time)
    }

    /// Last step whose time is <= `time`.
    pub fn point_at(&self, time: f64) -> Option<&SurvivalPoint> {
        let idx = self.points.partition_point(|p| p.time <= time);
        if idx == 0 {
            None
        } else {
            self.points.get(idx - 1)
        }
    }

    /// First time the survival probability drops to 0.5 or below.
    pub fn median_survival(&self) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.survival <= 0.5)
            .map(|p| p.time)
    }

    /// `(time, survival)` pairs for charting.
    ///
    /// Zero-duration events put a second pair at `t = 0` after the origin,
    /// so the times are non-decreasing rather than strictly increasing.
    pub fn to_pairs(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.time, p.survival)).collect()
    }

    /// `(time, 1 - survival)` pairs: the probability of winning by each time.
    pub fn cumulative_incidence(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.time, p.win_probability()))
            .collect()
    }
}

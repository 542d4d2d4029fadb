//! Kaplan–Meier estimation over right-censored deal durations.

use tracing::debug;

use super::confidence::{z_score, Greenwood};
use super::curve::{ConfidenceBand, SurvivalCurve, SurvivalPoint};
use super::record::{validate, PipelineRecord};
use crate::error::SurvivalError;

/// Fit a survival curve without confidence bands.
///
/// Fails with [`SurvivalError::EmptyInput`] on empty input and with
/// [`SurvivalError::InvalidRecord`] on the first negative or non-finite
/// duration. The result does not depend on input order.
pub fn estimate(records: &[PipelineRecord]) -> Result<SurvivalCurve, SurvivalError> {
    KaplanMeier::new().fit(records)
}

/// Configurable Kaplan–Meier estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KaplanMeier {
    confidence_level: Option<f64>,
}

impl KaplanMeier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach pointwise confidence bands at `level` (e.g. 0.95).
    pub fn with_confidence(mut self, level: f64) -> Self {
        self.confidence_level = Some(level);
        self
    }

    pub fn confidence_level(&self) -> Option<f64> {
        self.confidence_level
    }

    /// Fit the curve.
    pub fn fit(&self, records: &[PipelineRecord]) -> Result<SurvivalCurve, SurvivalError> {
        validate(records)?;

        let mut greenwood = match self.confidence_level {
            Some(level) => Some(Greenwood::new(z_score(level)?)),
            None => None,
        };

        let mut sorted: Vec<(f64, bool)> = records
            .iter()
            .map(|r| (normalize_zero(r.duration), r.event_observed))
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total = sorted.len();
        let mut origin = SurvivalPoint::origin(total);
        if greenwood.is_some() {
            origin.confidence = Some(ConfidenceBand {
                lower: 1.0,
                upper: 1.0,
            });
        }
        let mut points = vec![origin];

        let mut survival = 1.0_f64;
        let mut remaining = total;
        let mut i = 0;
        while i < sorted.len() {
            let time = sorted[i].0;
            let mut events = 0;
            let mut censored = 0;
            while i < sorted.len() && sorted[i].0 == time {
                if sorted[i].1 {
                    events += 1;
                } else {
                    censored += 1;
                }
                i += 1;
            }

            let at_risk = remaining;
            remaining -= events + censored;

            // Censoring at the origin only shrinks later risk sets.
            if time == 0.0 && events == 0 {
                points[0].censored += censored;
                continue;
            }

            if events > 0 {
                survival *= 1.0 - events as f64 / at_risk as f64;
            }

            let confidence = greenwood
                .as_mut()
                .map(|gw| gw.step(events, at_risk, survival));

            points.push(SurvivalPoint {
                time,
                survival: survival.clamp(0.0, 1.0),
                at_risk,
                events,
                censored,
                confidence,
            });
        }

        let curve = SurvivalCurve::new(points, total, self.confidence_level);
        debug!(
            records = total,
            events = curve.event_count(),
            steps = curve.points().len(),
            final_survival = curve.points().last().map(|p| p.survival).unwrap_or(1.0),
            "fitted Kaplan-Meier curve"
        );
        Ok(curve)
    }
}

/// Fold -0.0 into 0.0 so the origin is a single time.
fn normalize_zero(duration: f64) -> f64 {
    if duration == 0.0 {
        0.0
    } else {
        duration
    }
}

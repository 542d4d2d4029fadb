//! Conditional survival: given a deal is still open at `t`, how likely is it
//! to still be open (or to have closed) by `t + k`?
//!
//! `S(t + k | t) = S(t + k) / S(t)`. The look-ahead time is clamped to the
//! last observed duration since the curve is undefined beyond it.

use serde::{Deserialize, Serialize};

use super::curve::SurvivalCurve;
use crate::error::StatsError;

/// One row of a conditional survival table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRow {
    /// Time already spent in the pipeline
    pub elapsed: f64,
    /// Time the ratio was evaluated at (after clamping)
    pub look_ahead: f64,
    /// `S(look_ahead) / S(elapsed)`, `None` when `S(elapsed) == 0`
    pub survival: Option<f64>,
    /// `1 - survival`
    pub win_probability: Option<f64>,
}

/// Conditional survival for a single elapsed time.
pub fn conditional_survival(
    curve: &SurvivalCurve,
    elapsed: f64,
    horizon: f64,
) -> Result<ConditionalRow, StatsError> {
    check_horizon(horizon)?;
    Ok(row(curve, elapsed, horizon))
}

/// Conditional survival for every step time of the curve.
pub fn conditional_table(
    curve: &SurvivalCurve,
    horizon: f64,
) -> Result<Vec<ConditionalRow>, StatsError> {
    check_horizon(horizon)?;

    let mut rows: Vec<ConditionalRow> = Vec::with_capacity(curve.points().len());
    for point in curve.points() {
        if rows.last().is_some_and(|r| r.elapsed == point.time) {
            continue;
        }
        rows.push(row(curve, point.time, horizon));
    }
    Ok(rows)
}

fn check_horizon(horizon: f64) -> Result<(), StatsError> {
    if !horizon.is_finite() || horizon < 0.0 {
        return Err(StatsError::parameter(
            "look_ahead",
            format!("must be a non-negative number, got {horizon}"),
        ));
    }
    Ok(())
}

fn row(curve: &SurvivalCurve, elapsed: f64, horizon: f64) -> ConditionalRow {
    let look_ahead = (elapsed + horizon).min(curve.last_time()).max(elapsed);
    let base = curve.survival_at(elapsed);
    let survival = if base > 0.0 {
        Some((curve.survival_at(look_ahead) / base).clamp(0.0, 1.0))
    } else {
        None
    };
    ConditionalRow {
        elapsed,
        look_ahead,
        survival,
        win_probability: survival.map(|s| 1.0 - s),
    }
}

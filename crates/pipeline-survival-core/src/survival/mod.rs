//! Survival analysis for sales pipelines.
//!
//! This module provides Kaplan–Meier estimation over right-censored deal
//! durations, pointwise confidence bands, conditional survival tables, and
//! per-product cohort curves built from dated deals.

mod cohort;
mod conditional;
mod confidence;
mod curve;
mod estimator;
mod record;
mod report;

pub use cohort::{CohortAnalysis, Deal, DurationUnit, ProductCurve};
pub use conditional::{conditional_survival, conditional_table, ConditionalRow};
pub use confidence::z_score;
pub use curve::{ConfidenceBand, SurvivalCurve, SurvivalPoint};
pub use estimator::{estimate, KaplanMeier};
pub use record::{validate, PipelineRecord};
pub use report::{render_conditional, render_curve};

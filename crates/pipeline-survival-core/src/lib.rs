//! # pipeline-survival Core Library
//!
//! This library provides the analysis behind the `pipeline-survival` CLI:
//! how long B2B deals stay open, how likely they are to close, and how
//! reliable average deal values are for forecasting. The CLI is a thin
//! layer over the same library.
//!
//! ## Architecture
//!
//! - **Survival**: Kaplan–Meier estimation over right-censored deal
//!   durations, with confidence bands, conditional survival, and per-product
//!   cohort curves
//! - **Ingest**: CSV and JSON readers for deal data
//! - **Stats**: Deal value summaries and histograms
//! - **Forecast**: Monte Carlo revenue simulation
//! - **Config**: TOML-based analysis defaults
//!
//! ## Key Components
//!
//! - [`estimate`]: Fit a survival curve from pipeline records
//! - [`KaplanMeier`]: Configurable estimator with confidence bands
//! - [`CohortAnalysis`]: Dated deals to per-product curves
//! - [`RevenueSimulator`]: Monte Carlo revenue forecasts
//! - [`Config`]: Application configuration management

pub mod config;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod stats;
pub mod survival;

pub use config::{data_dir, Config};
pub use error::{ConfigError, CoreError, IngestError, InvalidReason, StatsError, SurvivalError};
pub use forecast::{ForecastConfig, RevenueForecast, RevenueSimulator};
pub use stats::{DealValueSummary, HistogramBin};
pub use survival::{
    conditional_survival, conditional_table, estimate, CohortAnalysis, ConditionalRow, Deal,
    DurationUnit, KaplanMeier, PipelineRecord, ProductCurve, SurvivalCurve, SurvivalPoint,
};

//! Statistics module for deal values.
//!
//! Descriptive summaries and histograms of won-deal values, used to show how
//! far the average contract value can drift from the median.

mod deal_values;

pub(crate) use deal_values::check_values;

pub use deal_values::{
    histogram, parse_value_list, render_summary, DealValueSummary, HistogramBin,
};

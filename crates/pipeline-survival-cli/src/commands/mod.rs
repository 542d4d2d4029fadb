pub mod conditional;
pub mod config;
pub mod deals;
pub mod estimate;
pub mod products;

use chrono::NaiveDate;
use pipeline_survival_core::ingest::parse_date;
use serde::Serialize;

/// Clap value parser for `--cutoff`.
pub(crate) fn parse_cutoff(value: &str) -> Result<NaiveDate, String> {
    parse_date(0, value)
        .map_err(|_| format!("invalid date '{value}' (use YYYY-MM-DD or MM/DD/YYYY)"))
}

/// The cutoff to use when none is given.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

use std::path::{Path, PathBuf};

use clap::Subcommand;
use pipeline_survival_core::forecast::render_forecast;
use pipeline_survival_core::ingest::{read_deal_values, select_product};
use pipeline_survival_core::stats::{histogram, parse_value_list, render_summary};
use pipeline_survival_core::{Config, DealValueSummary, HistogramBin, RevenueSimulator};
use serde::Serialize;

#[derive(Subcommand)]
pub enum DealsAction {
    /// Summary statistics and histogram of won-deal values
    Describe {
        /// Comma-separated deal values (e.g. "60,40,55,45,50")
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        values: Option<String>,
        /// JSON file mapping product name to deal values
        #[arg(long)]
        file: Option<PathBuf>,
        /// Product to read from --file (default: all products pooled)
        #[arg(long, requires = "file")]
        product: Option<String>,
        /// Histogram bins (default: output.histogram_bins)
        #[arg(long)]
        bins: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Monte Carlo forecast of revenue from the next N deals
    Forecast {
        /// Comma-separated deal values
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        values: Option<String>,
        /// JSON file mapping product name to deal values
        #[arg(long, requires = "product")]
        file: Option<PathBuf>,
        /// Product to read from --file
        #[arg(long, requires = "file")]
        product: Option<String>,
        /// Deals to close in the period (default: forecast.deals_to_close)
        #[arg(long)]
        deals: Option<usize>,
        /// Simulated futures (default: forecast.futures)
        #[arg(long)]
        futures: Option<usize>,
        /// Random seed for reproducible runs (default: forecast.seed)
        #[arg(long)]
        seed: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct DescribeOutput {
    summary: DealValueSummary,
    histogram: Vec<HistogramBin>,
}

pub fn run(action: DealsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        DealsAction::Describe {
            values,
            file,
            product,
            bins,
            json,
        } => {
            let (label, values) = load_values(values, file.as_deref(), product.as_deref())?;
            let bins = bins.unwrap_or(config.output.histogram_bins);
            let summary = DealValueSummary::from_values(&values)?;
            let histogram = histogram(&values, bins)?;

            if json || config.output.json {
                super::print_json(&DescribeOutput { summary, histogram })?;
            } else {
                print!("{}", render_summary(&label, &summary));
                print!("{}", render_histogram(&histogram));
            }
        }
        DealsAction::Forecast {
            values,
            file,
            product,
            deals,
            futures,
            seed,
            json,
        } => {
            let (label, values) = load_values(values, file.as_deref(), product.as_deref())?;
            let mut forecast_config = config.forecast.clone();
            if let Some(deals) = deals {
                forecast_config.deals_to_close = deals;
            }
            if let Some(futures) = futures {
                forecast_config.futures = futures;
            }
            if seed.is_some() {
                forecast_config.seed = seed;
            }

            let forecast = RevenueSimulator::with_config(forecast_config).simulate(&values)?;

            if json || config.output.json {
                super::print_json(&forecast)?;
            } else {
                print!("{}", render_forecast(&label, &forecast));
            }
        }
    }
    Ok(())
}

/// Values from `--values`, or from `--file` narrowed by `--product`.
fn load_values(
    values: Option<String>,
    file: Option<&Path>,
    product: Option<&str>,
) -> Result<(String, Vec<f64>), Box<dyn std::error::Error>> {
    match (values, file) {
        (Some(list), _) => Ok(("--values".to_string(), parse_value_list(&list)?)),
        (None, Some(path)) => {
            let all = read_deal_values(path)?;
            let label = product.unwrap_or("all products").to_string();
            Ok((label, select_product(&all, product)?))
        }
        (None, None) => Err("either --values or --file is required".into()),
    }
}

fn render_histogram(bins: &[HistogramBin]) -> String {
    const WIDTH: usize = 40;
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    let mut output = String::from("\nHistogram\n");
    output.push_str(&"-".repeat(50));
    output.push('\n');
    for bin in bins {
        let bar = "#".repeat(bin.count * WIDTH / peak);
        output.push_str(&format!(
            "{:>10.1} - {:<10.1} {:>6} {bar}\n",
            bin.lower, bin.upper, bin.count
        ));
    }
    output
}

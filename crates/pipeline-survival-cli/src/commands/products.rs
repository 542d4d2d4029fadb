use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use pipeline_survival_core::ingest::read_deals;
use pipeline_survival_core::survival::render_curve;
use pipeline_survival_core::{CohortAnalysis, Config, DurationUnit, KaplanMeier};

#[derive(Args)]
pub struct ProductsArgs {
    /// CSV file with ProductId,SQLDate,WonDate columns
    file: PathBuf,
    /// Date open deals are censored at; deals opened later are skipped (default: today)
    #[arg(long, value_parser = super::parse_cutoff)]
    cutoff: Option<NaiveDate>,
    /// Duration unit: day or week (default: analysis.unit)
    #[arg(long)]
    unit: Option<DurationUnit>,
    /// Confidence level for pointwise bands (default: analysis.confidence_level)
    #[arg(long)]
    confidence: Option<f64>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ProductsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let unit = args.unit.unwrap_or(config.analysis.unit);
    let level = args.confidence.unwrap_or(config.analysis.confidence_level);
    let cutoff = args.cutoff.unwrap_or_else(super::today);

    let deals = read_deals(&args.file)?;
    let curves = CohortAnalysis::new(unit)
        .with_estimator(KaplanMeier::new().with_confidence(level))
        .by_product(&deals, cutoff)?;

    if args.json || config.output.json {
        super::print_json(&curves)?;
    } else {
        println!("Cutoff: {cutoff}");
        for product in &curves {
            let label = format!("Product {}", product.product_id);
            print!("{}", render_curve(&label, &unit.to_string(), &product.curve));
        }
    }
    Ok(())
}

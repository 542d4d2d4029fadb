use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use pipeline_survival_core::ingest::read_deals;
use pipeline_survival_core::survival::render_conditional;
use pipeline_survival_core::{
    conditional_table, CohortAnalysis, ConditionalRow, Config, DurationUnit,
};
use serde::Serialize;

#[derive(Args)]
pub struct ConditionalArgs {
    /// CSV file with ProductId,SQLDate,WonDate columns
    file: PathBuf,
    /// Units to look ahead (default: analysis.look_ahead)
    #[arg(long)]
    look_ahead: Option<u32>,
    /// Date open deals are censored at; deals opened later are skipped (default: today)
    #[arg(long, value_parser = super::parse_cutoff)]
    cutoff: Option<NaiveDate>,
    /// Duration unit: day or week (default: analysis.unit)
    #[arg(long)]
    unit: Option<DurationUnit>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ProductTable {
    product_id: String,
    look_ahead: u32,
    rows: Vec<ConditionalRow>,
}

pub fn run(args: ConditionalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let unit = args.unit.unwrap_or(config.analysis.unit);
    let look_ahead = args.look_ahead.unwrap_or(config.analysis.look_ahead);
    let cutoff = args.cutoff.unwrap_or_else(super::today);

    let deals = read_deals(&args.file)?;
    let curves = CohortAnalysis::new(unit).by_product(&deals, cutoff)?;

    let mut tables = Vec::with_capacity(curves.len());
    for product in curves {
        tables.push(ProductTable {
            rows: conditional_table(&product.curve, f64::from(look_ahead))?,
            product_id: product.product_id,
            look_ahead,
        });
    }

    if args.json || config.output.json {
        super::print_json(&tables)?;
    } else {
        for table in &tables {
            let label = format!("Product {}", table.product_id);
            print!(
                "{}",
                render_conditional(&label, &unit.to_string(), f64::from(look_ahead), &table.rows)
            );
        }
    }
    Ok(())
}

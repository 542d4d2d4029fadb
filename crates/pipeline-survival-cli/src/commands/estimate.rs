use std::path::PathBuf;

use clap::Args;
use pipeline_survival_core::ingest::read_records;
use pipeline_survival_core::survival::render_curve;
use pipeline_survival_core::{Config, KaplanMeier, SurvivalCurve};
use serde::Serialize;

#[derive(Args)]
pub struct EstimateArgs {
    /// CSV file with duration,event columns
    file: PathBuf,
    /// Confidence level for pointwise bands (default: analysis.confidence_level)
    #[arg(long)]
    confidence: Option<f64>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct EstimateOutput<'a> {
    median: Option<f64>,
    #[serde(flatten)]
    curve: &'a SurvivalCurve,
}

pub fn run(args: EstimateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let level = args.confidence.unwrap_or(config.analysis.confidence_level);

    let records = read_records(&args.file)?;
    let curve = KaplanMeier::new().with_confidence(level).fit(&records)?;

    if args.json || config.output.json {
        super::print_json(&EstimateOutput {
            median: curve.median_survival(),
            curve: &curve,
        })?;
    } else {
        let label = args.file.display().to_string();
        print!("{}", render_curve(&label, "unit", &curve));
    }
    Ok(())
}

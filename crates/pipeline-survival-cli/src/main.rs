use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "pipeline-survival",
    version,
    about = "Time-to-close analysis for B2B sales pipelines"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a survival curve from a duration,event CSV
    Estimate(commands::estimate::EstimateArgs),
    /// Per-product curves from a ProductId,SQLDate,WonDate CSV
    Products(commands::products::ProductsArgs),
    /// Probability of closing within the next K units, given elapsed time
    Conditional(commands::conditional::ConditionalArgs),
    /// Deal value statistics and revenue forecasts
    Deals {
        #[command(subcommand)]
        action: commands::deals::DealsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr so JSON on stdout stays parseable. `RUST_LOG` overrides.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Estimate(args) => commands::estimate::run(args),
        Commands::Products(args) => commands::products::run(args),
        Commands::Conditional(args) => commands::conditional::run(args),
        Commands::Deals { action } => commands::deals::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

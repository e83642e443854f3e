mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::applicant::FeaturesArgs;
use commands::scoring::{AssessArgs, RecordArgs, SchemaArgs};

/// Loan default risk calculator
#[derive(Parser)]
#[command(
    name = "drc",
    version,
    about = "Loan default risk calculator",
    long_about = "Derives affordability ratios from loan applicant attributes, assembles \
                  the fixed-schema scoring record a trained classifier expects, and \
                  scores it. Without a classifier a clearly flagged mock probability \
                  is returned."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the derived affordability ratios
    Features(FeaturesArgs),
    /// Assemble the scoring record for the configured schema
    Record(RecordArgs),
    /// Score an applicant end to end
    Assess(AssessArgs),
    /// List the configured scoring schema
    Schema(SchemaArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "default_risk_core=debug,drc=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Features(args) => commands::applicant::run_features(args),
        Commands::Record(args) => commands::scoring::run_record(args),
        Commands::Assess(args) => commands::scoring::run_assess(args),
        Commands::Schema(args) => commands::scoring::run_schema(args),
        Commands::Version => {
            println!("drc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

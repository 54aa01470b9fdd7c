use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rust_osquery_summary::{run_analysis, AnalyzeOptions};

#[derive(Parser)]
#[command(name = "rust-osquery-summary")]
#[command(author, version, about = "Summarize the osquery SQL carried by case-management exports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the datasets named in a YAML configuration file
    Analyze {
        /// Path to the YAML configuration file
        #[arg(short, long, default_value = "osquery_data_config.yml")]
        config: PathBuf,

        /// Directory for the summary outputs
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            config,
            output_dir,
            verbose,
        } => {
            init_logging(verbose);

            let options = AnalyzeOptions {
                config_path: config,
                output_dir,
                verbose,
            };

            run_analysis(options)?;
        }
    }

    Ok(())
}

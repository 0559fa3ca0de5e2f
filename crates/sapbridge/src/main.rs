// crates/sapbridge/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use sapbridge_core::{pipeline, HarmonizeConfig, RunSummary};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// A CLI for the Sapbridge SAP data harmonization pipeline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Harmonize one system's local-material tables into the unified schema.
    LocalMaterial(HarmonizeArgs),
    /// Harmonize one system's process-order tables into the unified schema.
    ProcessOrder(HarmonizeArgs),
    /// Union already-harmonized CSVs from multiple systems into one file.
    Union(UnionArgs),
}

#[derive(Args, Debug)]
struct HarmonizeArgs {
    /// Directory holding the raw SAP table extracts for one system
    #[arg(short, long)]
    data_dir: PathBuf,
    /// Source system name stamped into the system_name column
    #[arg(short, long)]
    system: String,
    /// Directory the harmonized CSV is written to
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,
    /// Output file name; defaults per dataset when omitted
    #[arg(short, long)]
    file_name: Option<String>,
    /// Optional TOML file with per-system settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct UnionArgs {
    /// Harmonized CSVs to union; repeat the flag once per file
    #[arg(short, long, required = true)]
    input: Vec<PathBuf>,
    /// Directory the unioned CSV is written to
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,
    /// Output file name
    #[arg(short, long, default_value = "unified.csv")]
    file_name: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let summary = match cli.command {
        Command::LocalMaterial(args) => {
            let config = load_config(args.config.as_deref())?;
            let file_name = args.file_name.as_deref().unwrap_or("local_material.csv");
            pipeline::process_local_material(
                &args.data_dir,
                &args.system,
                &args.output_dir,
                file_name,
                &config,
            )?
        }
        Command::ProcessOrder(args) => {
            let config = load_config(args.config.as_deref())?;
            let file_name = args.file_name.as_deref().unwrap_or("process_order.csv");
            pipeline::process_order(
                &args.data_dir,
                &args.system,
                &args.output_dir,
                file_name,
                &config,
            )?
        }
        Command::Union(args) => {
            pipeline::union_outputs(&args.input, &args.output_dir, &args.file_name)?
        }
    };

    info!(output = %summary.output_path.display(), "run finished");
    println!("{}", render_summary(&summary));

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<HarmonizeConfig> {
    match path {
        Some(path) => HarmonizeConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(HarmonizeConfig::default()),
    }
}

fn render_summary(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["dataset", "system", "rows", "columns", "output"]);
    table.add_row(vec![
        summary.dataset.clone(),
        summary
            .system_name
            .clone()
            .unwrap_or_else(|| "-".to_string()),
        summary.row_count.to_string(),
        summary.column_count.to_string(),
        summary.output_path.display().to_string(),
    ]);
    table
}

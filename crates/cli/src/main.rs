//! Stowage packing CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stowage::Packer;
use stowage_cli::{PackReport, PackRequest};

#[derive(Parser)]
#[command(name = "stowage")]
#[command(about = "Load boxes into containers")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack the items of a request file into its containers
    Pack {
        /// Path to the JSON request
        input: PathBuf,

        /// Output file for the report (JSON); printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pack every item individually
        #[arg(long)]
        no_fusion: bool,

        /// Override the dimension tolerance
        #[arg(short, long)]
        tolerance: Option<f64>,
    },

    /// Check a request file without packing it
    Validate {
        /// Path to the JSON request
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Pack {
            input,
            output,
            no_fusion,
            tolerance,
        } => {
            let request = PackRequest::from_file(&input)?;

            let mut config = request.config.clone();
            if no_fusion {
                config = config.with_fusion(false);
            }
            if let Some(tolerance) = tolerance {
                config = config.with_tolerance(tolerance);
            }

            let items = request.items();
            let containers = request.containers()?;
            log::info!(
                "packing {} items into up to {} containers",
                items.len(),
                containers.len()
            );

            let plan = Packer::new(config).pack_into_containers(&items, &containers)?;
            let report = PackReport::from_plan(&plan);

            log::info!(
                "packed {} items in {} containers ({} utilisation), {} unpacked",
                report.summary.packed_count,
                report.summary.containers_used,
                report.summary.utilization_percent(),
                report.unpacked.len()
            );
            log::debug!(
                "orientations used: {:?}",
                report.stats.orientation_distribution
            );

            match output {
                Some(path) => {
                    report.save_json(&path)?;
                    log::info!("report saved to: {}", path.display());
                }
                None => println!("{}", report.to_json()?),
            }
        }

        Commands::Validate { input } => {
            let request = PackRequest::from_file(&input)?;
            let (items, containers) = request.validate()?;
            println!(
                "{}: {} items, {} containers, ok",
                input.display(),
                items,
                containers
            );
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;
use descent_graph::{DescentReport, ElevationGrid, GridError, ReconstructionOptions, TerrainGraph};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the elevation map: `width height` then one line per row
    map: PathBuf,

    /// Print the full report as JSON
    #[arg(short, long)]
    json: bool,

    /// Include the frontier of every level below each peak
    #[arg(short, long)]
    trace: bool,

    /// How many shorter path lengths to count summits for
    #[arg(short, long, default_value_t = 3)]
    alternatives: usize,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

fn print_summary(report: &DescentReport) {
    println!(
        "map {}x{}: {} nodes, {} edges, {} summits",
        report.width, report.height, report.nodes, report.edges, report.summits
    );
    for peak in &report.peaks {
        println!(
            "peak x: {}, y: {}, elevation: {}, drop: {}",
            peak.cell.x, peak.cell.y, peak.cell.elevation, peak.vertical_drop
        );
        for (level, cells) in peak.levels.iter().enumerate() {
            for cell in cells {
                println!(
                    "  level[{}]: x: {}, y: {}, elevation: {}",
                    level + 1,
                    cell.x,
                    cell.y,
                    cell.elevation
                );
            }
        }
    }
    for alt in &report.alternatives {
        println!("paths with length {}: {}", alt.path_length, alt.summits);
    }
    println!("longest path: {}", report.longest_path);
    println!("max vertical drop: {}", report.max_vertical_drop);
    if let Some(best) = report.best_peak {
        println!("from x: {}, y: {}, elevation: {}", best.x, best.y, best.elevation);
    }
}

fn run(args: Cli) -> Result<(), CliError> {
    let grid = ElevationGrid::load(&args.map)?;
    let graph = TerrainGraph::build(&grid);

    let mut options = ReconstructionOptions::default();
    if args.trace {
        options = options.with_level_trace();
    }
    let report = DescentReport::compute(&graph, args.alternatives, options);
    info!(
        longest_path = report.longest_path,
        max_vertical_drop = report.max_vertical_drop,
        "done"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    run(args).inspect_err(|e| error!("{e}"))
}

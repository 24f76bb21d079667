//! CLI entry point for the apronbus demand estimator.
//!
//! Reads a flight schedule export, runs the demand pipeline, prints the
//! peak and run counts, and optionally writes the full-resolution and
//! reporting-resolution tables as CSV.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use apronbus::io::export::write_demand_csv;
use apronbus::{DemandPipeline, DemandReport, ServiceParams};

#[derive(Parser)]
#[command(name = "apronbus")]
#[command(about = "Estimate shuttle-bus demand from a flight schedule export", long_about = None)]
struct Cli {
    /// Flight schedule export (CSV)
    #[arg(value_name = "SCHEDULE_CSV")]
    input: PathBuf,

    /// Service parameters TOML file (defaults built in)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the 5-minute demand table to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the 15-minute reporting table to this CSV file
    #[arg(long)]
    reporting_output: Option<PathBuf>,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    peak_buses: u32,
    peak_tick: Option<String>,
    ticks: usize,
    accumulated_flights: usize,
    unclassified_excluded: usize,
    filter: &'a apronbus::preprocessing::eligibility::FilterSummary,
    ingest: &'a apronbus::parsing::csv_parser::IngestReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let params = match &cli.config {
        Some(path) => ServiceParams::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServiceParams::default(),
    };

    let pipeline = DemandPipeline::with_params(params)?;
    let report = pipeline
        .run_file(&cli.input)
        .with_context(|| format!("Failed to process {}", cli.input.display()))?;

    if report.accumulated_flights == 0 {
        warn!("no eligible flights; the demand series is empty");
    }

    if let Some(path) = &cli.output {
        write_demand_csv(&report.table, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote 5-minute demand table");
    }

    if let Some(path) = &cli.reporting_output {
        let reporting = report.reporting_table(pipeline.params());
        write_demand_csv(&reporting, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote reporting demand table");
    }

    print_summary(&report, cli.json)?;
    Ok(())
}

fn print_summary(report: &DemandReport, json: bool) -> Result<()> {
    let summary = RunSummary {
        peak_buses: report.peak.buses,
        peak_tick: report
            .peak
            .tick
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        ticks: report.table.grid.len(),
        accumulated_flights: report.accumulated_flights,
        unclassified_excluded: report.unclassified_excluded,
        filter: &report.filter,
        ingest: &report.ingest,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        match &summary.peak_tick {
            Some(tick) => println!("Peak buses needed: {} (at {})", summary.peak_buses, tick),
            None => println!("Peak buses needed: 0 (no eligible flights)"),
        }
        println!(
            "Flights accumulated: {} ({} eligible, {} unclassified terminal excluded)",
            summary.accumulated_flights, report.filter.kept, summary.unclassified_excluded
        );
        println!(
            "Rows excluded at ingestion: {} (arrival: {}, departure: {})",
            report.ingest.excluded_rows(),
            report.ingest.arrival.excluded_rows(),
            report.ingest.departure.excluded_rows()
        );
    }
    Ok(())
}

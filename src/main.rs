//! CLI entry point for the sales report tool.
//!
//! Provides subcommands for running the full cleaning and aggregation
//! pipeline with a revenue chart, and for inspecting a raw sales file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sales_report::analysis::types::SalesReport;
use sales_report::chart::{ChartOptions, render_bar_chart};
use sales_report::table::DATA;
use sales_report::{Dataset, loader, output, transform};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Rows shown in the preview of the cleaned table.
const PREVIEW_ROWS: usize = 5;

#[derive(Parser)]
#[command(name = "sales_report")]
#[command(about = "Clean a sales CSV, rank products, categories and customers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the sales file, print rankings and save the revenue chart
    Analyze {
        /// Sales CSV to read
        #[arg(value_name = "FILE", default_value = "dados_vendas.csv")]
        input: PathBuf,

        /// Column converted to datetime
        #[arg(short, long, default_value = DATA)]
        date_column: String,
    },
    /// Load the sales file and print its columns and first rows
    Inspect {
        /// Sales CSV to read
        #[arg(value_name = "FILE", default_value = "dados_vendas.csv")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sales_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sales_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { input, date_column } => analyze(&input, &date_column)?,
        Commands::Inspect { input } => {
            if let Dataset::Loaded(table) = loader::load(&input)? {
                output::print_info(&table);
                output::print_head(&table, PREVIEW_ROWS);
            }
        }
    }

    Ok(())
}

/// Runs load -> clean -> normalize -> derive, then reports and charts.
///
/// Stops quietly after the loader has logged a missing file.
#[tracing::instrument(skip(input), fields(input = %input.display()))]
fn analyze(input: &Path, date_column: &str) -> Result<()> {
    info!("Loading data");
    let dataset = loader::load(input)?;
    if let Some(table) = dataset.table() {
        output::print_info(table);
    }

    info!("Cleaning and converting");
    let Some(table) = transform::prepare(dataset, date_column).into_table() else {
        info!("No data loaded, stopping");
        return Ok(());
    };
    output::print_head(&table, PREVIEW_ROWS);

    info!("Analysis results");
    let report = SalesReport::from_table(&table);
    output::print_report(&report);
    output::print_pretty(&report);
    output::print_json(&report)?;

    info!("Rendering chart");
    render_bar_chart(&report.revenue_by_category, &ChartOptions::revenue_by_category())?;

    Ok(())
}

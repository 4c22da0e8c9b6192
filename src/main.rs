use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use compute_tools::{logging, totals, CommonArgs, ReportFormat, SalesConfig};

/// Compute the total cost of a sales record using a price catalogue
#[derive(Parser)]
#[command(name = "compute-sales", version)]
struct Cli {
    /// Price catalogue JSON file
    catalog: PathBuf,

    /// Sales record JSON file
    sales: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.common.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Ok(false) when an input file could not be loaded (report is still written)
fn run(cli: Cli) -> Result<bool> {
    let config = SalesConfig {
        catalog_path: cli.catalog,
        sales_path: cli.sales,
        results_dir: cli.common.results_dir,
        format: cli.format,
    };

    let run = totals::run(&config)?;

    for line in run.report.render_body() {
        println!("{}", line);
    }
    println!("Elapsed time: {:.6} seconds", run.report.elapsed_seconds);
    println!("Skipped items: {}", run.report.skipped_count());
    println!("\n✓ Results written to: {}", run.text_path.display());
    if let Some(path) = &run.json_path {
        println!("✓ JSON report written to: {}", path.display());
    }

    if run.load_failed() {
        eprintln!("❌ One or more input files could not be loaded; see the report for details.");
        return Ok(false);
    }

    Ok(true)
}
